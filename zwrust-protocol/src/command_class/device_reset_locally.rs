//! Device Reset Locally command class (0x5A)

use zwrust_core::PayloadCursor;
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const NOTIFICATION: u8 = 0x01;

/// Reports that a node was reset to factory defaults and left the network
#[derive(Debug)]
pub struct DeviceResetLocallyHandler {
    base: HandlerBase,
}

impl HandlerType for DeviceResetLocallyHandler {
    const ID: CommandClassId = CommandClassId::DeviceResetLocally;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for DeviceResetLocallyHandler {
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
            NOTIFICATION => {
                out.push(EventKind::DeviceResetLocally);
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
