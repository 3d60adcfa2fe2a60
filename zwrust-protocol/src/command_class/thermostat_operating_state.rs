//! Thermostat Operating State command class (0x42)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const GET: u8 = 0x02;
const REPORT: u8 = 0x03;

#[derive(Debug)]
pub struct ThermostatOperatingStateHandler {
    base: HandlerBase,
}

impl ThermostatOperatingStateHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }
}

impl HandlerType for ThermostatOperatingStateHandler {
    const ID: CommandClassId = CommandClassId::ThermostatOperatingState;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ThermostatOperatingStateHandler {
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
                let state = cursor.read_u8()? & 0x0F;
                out.push(EventKind::ThermostatOperatingState { state });
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
