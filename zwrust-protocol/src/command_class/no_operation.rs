//! No Operation command class (0x00)
//!
//! Carries no command; used to check whether a node is reachable.

use bytes::Bytes;
use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::CommandClassId;

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

#[derive(Debug)]
pub struct NoOperationHandler {
    base: HandlerBase,
}

impl NoOperationHandler {
    /// Ping the node
    pub fn encode_ping(&self) -> SendData {
        let context = self.base.context();
        SendData::new(context.node_id, Bytes::from_static(&[0x00]))
    }
}

impl HandlerType for NoOperationHandler {
    const ID: CommandClassId = CommandClassId::NoOperation;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for NoOperationHandler {
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
        _out: &mut DecodeOutput<'a>,
    ) -> Result<(), DecodeError> {
        self.base.ignore(command)
    }
}
