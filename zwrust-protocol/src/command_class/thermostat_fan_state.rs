//! Thermostat Fan State command class (0x45)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const GET: u8 = 0x02;
const REPORT: u8 = 0x03;

#[derive(Debug)]
pub struct ThermostatFanStateHandler {
    base: HandlerBase,
}

impl ThermostatFanStateHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }
}

impl HandlerType for ThermostatFanStateHandler {
    const ID: CommandClassId = CommandClassId::ThermostatFanState;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ThermostatFanStateHandler {
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
                out.push(EventKind::ThermostatFanState { state });
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_class::testing::{decode, handler, payload};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let mut fan = handler::<ThermostatFanStateHandler>(1);
        assert_eq!(payload(&fan.encode_get()), vec![0x45, 0x02]);
        assert_eq!(
            decode(&mut fan, &[REPORT, 0x02]),
            vec![EventKind::ThermostatFanState { state: 2 }]
        );
    }
}
