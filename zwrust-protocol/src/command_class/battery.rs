//! Battery command class (0x80)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const GET: u8 = 0x02;
const REPORT: u8 = 0x03;

/// Level byte meaning "battery low"
const LOW_WARNING: u8 = 0xFF;

#[derive(Debug)]
pub struct BatteryHandler {
    base: HandlerBase,
}

impl BatteryHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }
}

impl HandlerType for BatteryHandler {
    const ID: CommandClassId = CommandClassId::Battery;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for BatteryHandler {
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
                let raw = cursor.read_u8()?;
                let kind = if raw == LOW_WARNING {
                    EventKind::Battery { level: 0, low: true }
                } else {
                    EventKind::Battery {
                        level: raw.min(100),
                        low: false,
                    }
                };
                out.push(kind);
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
