//! Thermostat Fan Mode command class (0x44)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const SUPPORTED_GET: u8 = 0x04;
const SUPPORTED_REPORT: u8 = 0x05;

const OFF_FLAG: u8 = 0x80;
const MODE_MASK: u8 = 0x0F;

#[derive(Debug)]
pub struct ThermostatFanModeHandler {
    base: HandlerBase,
}

impl ThermostatFanModeHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    /// Select `mode`; the off flag exists from version 2 on
    pub fn encode_set(&self, mode: u8, off: bool) -> Result<SendData> {
        if mode > MODE_MASK {
            return Err(Error::InvalidArgument(format!("fan mode {}", mode)));
        }
        let mut value = mode;
        if off {
            self.base.require_version(SET, 2)?;
            value |= OFF_FLAG;
        }
        Ok(self.base.message(SET, &[value]))
    }

    pub fn encode_supported_get(&self) -> SendData {
        self.base.message(SUPPORTED_GET, &[])
    }
}

impl HandlerType for ThermostatFanModeHandler {
    const ID: CommandClassId = CommandClassId::ThermostatFanMode;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ThermostatFanModeHandler {
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
                let value = cursor.read_u8()?;
                let off = self.base.version() >= 2 && value & OFF_FLAG != 0;
                out.push(EventKind::ThermostatFanMode {
                    mode: value & MODE_MASK,
                    off,
                });
            }
            SUPPORTED_REPORT => {
                let modes = bitmask_to_list(cursor.read_remaining(), 0);
                out.push(EventKind::ThermostatFanModesSupported { modes });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
