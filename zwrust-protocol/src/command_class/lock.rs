//! Lock command class (0x76)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;

#[derive(Debug)]
pub struct LockHandler {
    base: HandlerBase,
}

impl LockHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_set(&self, locked: bool) -> SendData {
        self.base.message(SET, &[u8::from(locked)])
    }
}

impl HandlerType for LockHandler {
    const ID: CommandClassId = CommandClassId::Lock;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for LockHandler {
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
                let locked = cursor.read_u8()? != 0;
                out.push(EventKind::Lock { locked });
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
        let mut lock = handler::<LockHandler>(1);
        assert_eq!(payload(&lock.encode_set(true)), vec![0x76, 0x01, 0x01]);
        assert_eq!(payload(&lock.encode_get()), vec![0x76, 0x02]);
        assert_eq!(
            decode(&mut lock, &[REPORT, 0x01]),
            vec![EventKind::Lock { locked: true }]
        );
    }
}
