//! Hail command class (0x82)
//!
//! Obsolete. Older devices send it to ask the controller for a poll.

use zwrust_core::PayloadCursor;
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const HAIL: u8 = 0x01;

#[derive(Debug)]
pub struct HailHandler {
    base: HandlerBase,
}

impl HandlerType for HailHandler {
    const ID: CommandClassId = CommandClassId::Hail;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for HailHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase {
        &mut self.base
    }

    fn handle<'a>(
        &mut self,
        command: u8,
        _cursor: &mut PayloadCursor<'a>,
        out: &mut DecodeOutput<'a>,
    ) -> Result<(), DecodeError> {
        match command {
            HAIL => {
                out.push(EventKind::Hail);
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
