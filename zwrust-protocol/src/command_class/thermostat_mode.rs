//! Thermostat Mode command class (0x40)

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

const MODE_MASK: u8 = 0x1F;

/// Common mode ids
pub mod mode {
    pub const OFF: u8 = 0x00;
    pub const HEAT: u8 = 0x01;
    pub const COOL: u8 = 0x02;
    pub const AUTO: u8 = 0x03;
    pub const AUXILIARY: u8 = 0x04;
    pub const RESUME: u8 = 0x05;
    pub const FAN_ONLY: u8 = 0x06;
    pub const FURNACE: u8 = 0x07;
    pub const DRY_AIR: u8 = 0x08;
    pub const MOIST_AIR: u8 = 0x09;
    pub const AUTO_CHANGEOVER: u8 = 0x0A;
    pub const ENERGY_HEAT: u8 = 0x0B;
    pub const ENERGY_COOL: u8 = 0x0C;
    pub const AWAY: u8 = 0x0D;
    pub const FULL_POWER: u8 = 0x0F;
}

#[derive(Debug)]
pub struct ThermostatModeHandler {
    base: HandlerBase,
}

impl ThermostatModeHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_set(&self, mode: u8) -> Result<SendData> {
        if mode > MODE_MASK {
            return Err(Error::InvalidArgument(format!("thermostat mode {}", mode)));
        }
        Ok(self.base.message(SET, &[mode]))
    }

    pub fn encode_supported_get(&self) -> SendData {
        self.base.message(SUPPORTED_GET, &[])
    }
}

impl HandlerType for ThermostatModeHandler {
    const ID: CommandClassId = CommandClassId::ThermostatMode;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ThermostatModeHandler {
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
                let mode = cursor.read_u8()? & MODE_MASK;
                out.push(EventKind::ThermostatMode { mode });
            }
            SUPPORTED_REPORT => {
                let modes = bitmask_to_list(cursor.read_remaining(), 0);
                out.push(EventKind::ThermostatModesSupported { modes });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
