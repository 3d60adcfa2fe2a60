//! Color Switch command class (0x33)

use std::time::Duration;

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::{bitmask_to_list, encode_duration, parse_duration};
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SUPPORTED_GET: u8 = 0x01;
const SUPPORTED_REPORT: u8 = 0x02;
const GET: u8 = 0x03;
const REPORT: u8 = 0x04;
const SET: u8 = 0x05;

/// Color component ids
pub mod component {
    pub const WARM_WHITE: u8 = 0x00;
    pub const COLD_WHITE: u8 = 0x01;
    pub const RED: u8 = 0x02;
    pub const GREEN: u8 = 0x03;
    pub const BLUE: u8 = 0x04;
    pub const AMBER: u8 = 0x05;
    pub const CYAN: u8 = 0x06;
    pub const PURPLE: u8 = 0x07;
    pub const INDEXED: u8 = 0x08;
}

#[derive(Debug)]
pub struct ColorHandler {
    base: HandlerBase,
}

impl ColorHandler {
    /// Set count field holds 5 bits
    pub const MAX_COMPONENTS: usize = 0x1F;

    pub fn encode_supported_get(&self) -> SendData {
        self.base.message(SUPPORTED_GET, &[])
    }

    pub fn encode_get(&self, component: u8) -> SendData {
        self.base.message(GET, &[component])
    }

    /// Set several components at once
    ///
    /// The duration is sent from version 2 on.
    pub fn encode_set(&self, components: &[(u8, u8)], duration: Option<Duration>) -> Result<SendData> {
        if components.is_empty() || components.len() > Self::MAX_COMPONENTS {
            return Err(Error::InvalidArgument(format!(
                "{} color components (1-{} allowed)",
                components.len(),
                Self::MAX_COMPONENTS
            )));
        }

        let mut args = vec![components.len() as u8];
        for (id, value) in components {
            args.push(*id);
            args.push(*value);
        }
        if let Some(duration) = duration.filter(|_| self.base.version() >= 2) {
            args.push(encode_duration(duration));
        }
        Ok(self.base.message(SET, &args))
    }
}

impl HandlerType for ColorHandler {
    const ID: CommandClassId = CommandClassId::Color;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ColorHandler {
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
            SUPPORTED_REPORT => {
                let components = bitmask_to_list(cursor.read_bytes(2)?, 0);
                out.push(EventKind::ColorSupported { components });
            }
            REPORT => {
                let component = cursor.read_u8()?;
                let value = cursor.read_u8()?;
                let (target, duration) = if self.base.version() >= 3 && cursor.remaining() >= 2 {
                    (Some(cursor.read_u8()?), parse_duration(cursor.read_u8()?))
                } else {
                    (None, None)
                };
                out.push(EventKind::Color {
                    component,
                    value,
                    target,
                    duration,
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
    fn test_encode_set() {
        let color = handler::<ColorHandler>(1);
        let rgb = [(component::RED, 0xFF), (component::GREEN, 0x80), (component::BLUE, 0x00)];
        assert_eq!(
            payload(&color.encode_set(&rgb, Some(Duration::from_secs(1))).unwrap()),
            vec![0x33, 0x05, 3, 0x02, 0xFF, 0x03, 0x80, 0x04, 0x00]
        );

        let color = handler::<ColorHandler>(2);
        assert_eq!(
            payload(&color.encode_set(&rgb[..1], Some(Duration::from_secs(1))).unwrap()),
            vec![0x33, 0x05, 1, 0x02, 0xFF, 0x01]
        );

        assert!(color.encode_set(&[], None).is_err());
    }

    #[test]
    fn test_decode_supported_report() {
        let mut color = handler::<ColorHandler>(1);
        assert_eq!(
            decode(&mut color, &[SUPPORTED_REPORT, 0x1C, 0x00]),
            vec![EventKind::ColorSupported {
                components: vec![2, 3, 4]
            }]
        );
    }

    #[test]
    fn test_decode_report() {
        let mut color = handler::<ColorHandler>(3);
        assert_eq!(
            decode(&mut color, &[REPORT, component::RED, 0x40, 0xFF, 0x02]),
            vec![EventKind::Color {
                component: 2,
                value: 0x40,
                target: Some(0xFF),
                duration: Some(Duration::from_secs(2))
            }]
        );
    }
}
