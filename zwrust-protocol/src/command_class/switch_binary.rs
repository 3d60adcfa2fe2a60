//! Binary Switch command class (0x25)

use std::time::Duration;

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::{encode_duration, parse_duration};
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;

#[derive(Debug)]
pub struct SwitchBinaryHandler {
    base: HandlerBase,
}

impl SwitchBinaryHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    /// Switch on (`true`) or off
    ///
    /// The transition duration is only sent from version 2 on.
    pub fn encode_set(&self, on: bool, duration: Option<Duration>) -> SendData {
        let value = if on { 0xFF } else { 0x00 };
        match duration {
            Some(duration) if self.base.version() >= 2 => {
                self.base.message(SET, &[value, encode_duration(duration)])
            }
            _ => self.base.message(SET, &[value]),
        }
    }
}

impl HandlerType for SwitchBinaryHandler {
    const ID: CommandClassId = CommandClassId::SwitchBinary;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for SwitchBinaryHandler {
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
        if command != REPORT {
            return self.base.ignore(command);
        }

        let value = cursor.read_u8()?;
        let (target, duration) = if self.base.version() >= 2 && cursor.remaining() >= 2 {
            (Some(cursor.read_u8()?), parse_duration(cursor.read_u8()?))
        } else {
            (None, None)
        };

        out.push(EventKind::SwitchBinary {
            value,
            target,
            duration,
        });
        Ok(())
    }
}
