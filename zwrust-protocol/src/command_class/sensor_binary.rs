//! Binary Sensor command class (0x30)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const SUPPORTED_GET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const SUPPORTED_REPORT: u8 = 0x04;

#[derive(Debug)]
pub struct SensorBinaryHandler {
    base: HandlerBase,
}

impl SensorBinaryHandler {
    /// Request the sensor state; the type is only sent from version 2 on
    pub fn encode_get(&self, sensor_type: Option<u8>) -> SendData {
        match sensor_type {
            Some(sensor_type) if self.base.version() >= 2 => self.base.message(GET, &[sensor_type]),
            _ => self.base.message(GET, &[]),
        }
    }

    pub fn encode_supported_get(&self) -> Result<SendData> {
        self.base.require_version(SUPPORTED_GET, 2)?;
        Ok(self.base.message(SUPPORTED_GET, &[]))
    }
}

impl HandlerType for SensorBinaryHandler {
    const ID: CommandClassId = CommandClassId::SensorBinary;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for SensorBinaryHandler {
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
                let sensor_type = if self.base.version() >= 2 && !cursor.is_empty() {
                    Some(cursor.read_u8()?)
                } else {
                    None
                };
                out.push(EventKind::SensorBinary { sensor_type, value });
            }
            SUPPORTED_REPORT => {
                let sensor_types = bitmask_to_list(cursor.read_remaining(), 0);
                out.push(EventKind::SensorBinarySupported { sensor_types });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_class::testing::{decode, handler, payload};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_get() {
        let sensor = handler::<SensorBinaryHandler>(1);
        assert_eq!(payload(&sensor.encode_get(Some(0x0C))), vec![0x30, 0x02]);
        assert!(sensor.encode_supported_get().is_err());

        let sensor = handler::<SensorBinaryHandler>(2);
        assert_eq!(payload(&sensor.encode_get(Some(0x0C))), vec![0x30, 0x02, 0x0C]);
    }

    #[test]
    fn test_decode_report() {
        let mut sensor = handler::<SensorBinaryHandler>(1);
        assert_eq!(
            decode(&mut sensor, &[REPORT, 0xFF, 0x0C]),
            vec![EventKind::SensorBinary {
                sensor_type: None,
                value: 0xFF
            }]
        );

        let mut sensor = handler::<SensorBinaryHandler>(2);
        assert_eq!(
            decode(&mut sensor, &[REPORT, 0xFF, 0x0C]),
            vec![EventKind::SensorBinary {
                sensor_type: Some(0x0C),
                value: 0xFF
            }]
        );
    }

    #[test]
    fn test_decode_supported_report() {
        let mut sensor = handler::<SensorBinaryHandler>(2);
        assert_eq!(
            decode(&mut sensor, &[SUPPORTED_REPORT, 0b0000_0100, 0b0001_0000]),
            vec![EventKind::SensorBinarySupported {
                sensor_types: vec![2, 12]
            }]
        );
    }
}
