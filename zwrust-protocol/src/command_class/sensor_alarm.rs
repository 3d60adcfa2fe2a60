//! Sensor Alarm command class (0x9C)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const GET: u8 = 0x01;
const REPORT: u8 = 0x02;
const SUPPORTED_GET: u8 = 0x03;
const SUPPORTED_REPORT: u8 = 0x04;

/// Alarm types
pub mod alarm {
    pub const GENERAL_PURPOSE: u8 = 0x00;
    pub const SMOKE: u8 = 0x01;
    pub const CARBON_MONOXIDE: u8 = 0x02;
    pub const CARBON_DIOXIDE: u8 = 0x03;
    pub const HEAT: u8 = 0x04;
    pub const FLOOD: u8 = 0x05;
}

#[derive(Debug)]
pub struct SensorAlarmHandler {
    base: HandlerBase,
}

impl SensorAlarmHandler {
    pub fn encode_get(&self, alarm_type: u8) -> SendData {
        self.base.message(GET, &[alarm_type])
    }

    pub fn encode_supported_get(&self) -> SendData {
        self.base.message(SUPPORTED_GET, &[])
    }
}

impl HandlerType for SensorAlarmHandler {
    const ID: CommandClassId = CommandClassId::SensorAlarm;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for SensorAlarmHandler {
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
    ) -> Result<(), DecodeError> {
        match command {
            REPORT => {
                let source_node = cursor.read_u8()?;
                let alarm_type = cursor.read_u8()?;
                let level = cursor.read_u8()?;
                let seconds = cursor.read_u16()?;
                out.push(EventKind::SensorAlarm {
                    source_node,
                    alarm_type,
                    level,
                    seconds,
                });
            }
            SUPPORTED_REPORT => {
                let len = usize::from(cursor.read_u8()?);
                let alarm_types = bitmask_to_list(cursor.read_bytes(len)?, 0);
                out.push(EventKind::SensorAlarmSupported { alarm_types });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
