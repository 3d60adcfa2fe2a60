//! Indicator command class (0x87)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind, IndicatorObject};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const SUPPORTED_GET: u8 = 0x04;
const SUPPORTED_REPORT: u8 = 0x05;

const COUNT_MASK: u8 = 0x1F;

#[derive(Debug)]
pub struct IndicatorHandler {
    base: HandlerBase,
}

impl IndicatorHandler {
    /// Request the indicator value; version 2 can name one indicator
    pub fn encode_get(&self, indicator: Option<u8>) -> Result<SendData> {
        match indicator {
            Some(indicator) => {
                self.base.require_version(GET, 2)?;
                Ok(self.base.message(GET, &[indicator]))
            }
            None => Ok(self.base.message(GET, &[])),
        }
    }

    pub fn encode_set(&self, value: u8) -> SendData {
        self.base.message(SET, &[value])
    }

    /// Set version 2 objects
    pub fn encode_set_objects(&self, objects: &[IndicatorObject]) -> Result<SendData> {
        self.base.require_version(SET, 2)?;
        if objects.len() > usize::from(COUNT_MASK) {
            return Err(Error::InvalidArgument(format!("{} indicator objects", objects.len())));
        }

        let mut args = vec![0x00, objects.len() as u8];
        for object in objects {
            args.extend_from_slice(&[object.indicator, object.property, object.value]);
        }
        Ok(self.base.message(SET, &args))
    }

    pub fn encode_supported_get(&self, indicator: u8) -> Result<SendData> {
        self.base.require_version(SUPPORTED_GET, 2)?;
        Ok(self.base.message(SUPPORTED_GET, &[indicator]))
    }
}

impl HandlerType for IndicatorHandler {
    const ID: CommandClassId = CommandClassId::Indicator;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for IndicatorHandler {
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
                let mut objects = Vec::new();
                if self.base.version() >= 2 && !cursor.is_empty() {
                    let count = cursor.read_u8()? & COUNT_MASK;
                    for _ in 0..count {
                        let record = cursor.read_bytes(3)?;
                        objects.push(IndicatorObject {
                            indicator: record[0],
                            property: record[1],
                            value: record[2],
                        });
                    }
                }
                out.push(EventKind::Indicator { value, objects });
            }
            SUPPORTED_REPORT => {
                let indicator = cursor.read_u8()?;
                let next_indicator = cursor.read_u8()?;
                let len = usize::from(cursor.read_u8()? & COUNT_MASK);
                let properties = bitmask_to_list(cursor.read_bytes(len)?, 0);
                out.push(EventKind::IndicatorSupported {
                    indicator,
                    next_indicator,
                    properties,
                });
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
    fn test_v1() {
        let mut indicator = handler::<IndicatorHandler>(1);
        assert_eq!(payload(&indicator.encode_set(0xFF)), vec![0x87, 0x01, 0xFF]);
        assert!(indicator.encode_get(Some(0x50)).is_err());
        assert_eq!(
            decode(&mut indicator, &[REPORT, 0xFF]),
            vec![EventKind::Indicator {
                value: 0xFF,
                objects: vec![]
            }]
        );
    }

    #[test]
    fn test_v2_objects() {
        let mut indicator = handler::<IndicatorHandler>(2);
        let object = IndicatorObject {
            indicator: 0x50,
            property: 0x03,
            value: 0x08,
        };
        let request = indicator.encode_set_objects(&[object]).unwrap();
        assert_eq!(payload(&request), vec![0x87, 0x01, 0x00, 0x01, 0x50, 0x03, 0x08]);

        let mut report = vec![REPORT];
        report.extend_from_slice(&request.payload[2..]);
        assert_eq!(
            decode(&mut indicator, &report),
            vec![EventKind::Indicator {
                value: 0,
                objects: vec![object]
            }]
        );
    }

    #[test]
    fn test_supported_report() {
        let mut indicator = handler::<IndicatorHandler>(2);
        assert_eq!(
            decode(&mut indicator, &[SUPPORTED_REPORT, 0x50, 0x00, 0x01, 0x0E]),
            vec![EventKind::IndicatorSupported {
                indicator: 0x50,
                next_indicator: 0,
                properties: vec![1, 2, 3]
            }]
        );
    }
}
