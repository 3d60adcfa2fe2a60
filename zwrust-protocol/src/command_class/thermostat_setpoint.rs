//! Thermostat Setpoint command class (0x43)
//!
//! Versions 1 and 2 number the bits of the supported report with a gap
//! (bit 3 is setpoint type 7); version 3 maps bit n to type n.

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, Decimal, EventKind};

use super::value::{bitmask_to_list, ScaledValue};
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const SUPPORTED_GET: u8 = 0x04;
const SUPPORTED_REPORT: u8 = 0x05;

/// Setpoint type for each supported-report bit before version 3
const LEGACY_TYPES: [u8; 16] = [0, 1, 2, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19];

/// Common setpoint types
pub mod setpoint {
    pub const HEATING: u8 = 0x01;
    pub const COOLING: u8 = 0x02;
    pub const FURNACE: u8 = 0x07;
    pub const DRY_AIR: u8 = 0x08;
    pub const MOIST_AIR: u8 = 0x09;
    pub const AUTO_CHANGEOVER: u8 = 0x0A;
    pub const ENERGY_SAVE_HEATING: u8 = 0x0B;
    pub const ENERGY_SAVE_COOLING: u8 = 0x0C;
    pub const AWAY_HEATING: u8 = 0x0D;
}

#[derive(Debug)]
pub struct ThermostatSetpointHandler {
    base: HandlerBase,
}

impl ThermostatSetpointHandler {
    pub fn encode_get(&self, setpoint_type: u8) -> SendData {
        self.base.message(GET, &[setpoint_type & 0x0F])
    }

    /// Set `setpoint_type` to `value` in `scale` (0 Celsius, 1 Fahrenheit)
    pub fn encode_set(&self, setpoint_type: u8, scale: u8, value: Decimal) -> Result<SendData> {
        let mut args = vec![setpoint_type & 0x0F];
        args.extend(ScaledValue { scale, value }.encode()?);
        Ok(self.base.message(SET, &args))
    }

    pub fn encode_supported_get(&self) -> SendData {
        self.base.message(SUPPORTED_GET, &[])
    }

    fn supported_types(&self, mask: &[u8]) -> Vec<u8> {
        let bits = bitmask_to_list(mask, 0);
        if self.base.version() >= 3 {
            return bits;
        }
        bits.into_iter()
            .filter_map(|bit| LEGACY_TYPES.get(usize::from(bit)).copied())
            .filter(|setpoint_type| *setpoint_type != 0)
            .collect()
    }
}

impl HandlerType for ThermostatSetpointHandler {
    const ID: CommandClassId = CommandClassId::ThermostatSetpoint;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ThermostatSetpointHandler {
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
                let setpoint_type = cursor.read_u8()? & 0x0F;
                let ScaledValue { scale, value } = ScaledValue::read(cursor)?;
                out.push(EventKind::ThermostatSetpoint {
                    setpoint_type,
                    scale,
                    value,
                });
            }
            SUPPORTED_REPORT => {
                let setpoint_types = self.supported_types(cursor.read_remaining());
                out.push(EventKind::ThermostatSetpointsSupported { setpoint_types });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
