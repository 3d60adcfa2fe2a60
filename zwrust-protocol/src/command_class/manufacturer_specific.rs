//! Manufacturer Specific command class (0x72)

use zwrust_core::{PayloadCursor, SendData, StringEncoding};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const GET: u8 = 0x04;
const REPORT: u8 = 0x05;
const DEVICE_SPECIFIC_GET: u8 = 0x06;
const DEVICE_SPECIFIC_REPORT: u8 = 0x07;

/// Device id types
pub mod id_type {
    pub const FACTORY_DEFAULT: u8 = 0x00;
    pub const SERIAL_NUMBER: u8 = 0x01;
    pub const PSEUDO_RANDOM: u8 = 0x02;
}

/// Data format of a device id
const FORMAT_UTF8: u8 = 0x00;

#[derive(Debug)]
pub struct ManufacturerSpecificHandler {
    base: HandlerBase,
}

impl ManufacturerSpecificHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_device_specific_get(&self, id_type: u8) -> Result<SendData> {
        self.base.require_version(DEVICE_SPECIFIC_GET, 2)?;
        Ok(self.base.message(DEVICE_SPECIFIC_GET, &[id_type & 0x07]))
    }
}

impl HandlerType for ManufacturerSpecificHandler {
    const ID: CommandClassId = CommandClassId::ManufacturerSpecific;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ManufacturerSpecificHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase {
        &mut self.base
    }

    fn handle<'a>(
        &mut self,
        command: u8,
        cursor: &mut PayloadCursor<'a>,
        out: &mut DecodeOutput<'a>,
    ) -> std::result::Result<(), DecodeError> {
        match command {
            REPORT => {
                let manufacturer_id = cursor.read_u16()?;
                let device_type = cursor.read_u16()?;
                let device_id = cursor.read_u16()?;
                out.push(EventKind::ManufacturerSpecific {
                    manufacturer_id,
                    device_type,
                    device_id,
                });
            }
            DEVICE_SPECIFIC_REPORT => {
                let id_type = cursor.read_u8()? & 0x07;
                let properties = cursor.read_u8()?;
                let format = properties >> 5;
                let data = cursor.read_bytes(usize::from(properties & 0x1F))?;

                let id = if format == FORMAT_UTF8 {
                    zwrust_core::cursor::decode_string(data, StringEncoding::Utf8)
                } else {
                    hex::encode(data)
                };
                out.push(EventKind::DeviceSpecific { id_type, id });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
