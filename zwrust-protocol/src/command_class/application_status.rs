//! Application Status command class (0x22)

use zwrust_core::PayloadCursor;
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const BUSY: u8 = 0x01;
const REJECTED_REQUEST: u8 = 0x02;

/// Busy / rejected notifications sent in answer to a request
#[derive(Debug)]
pub struct ApplicationStatusHandler {
    base: HandlerBase,
}

impl HandlerType for ApplicationStatusHandler {
    const ID: CommandClassId = CommandClassId::ApplicationStatus;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ApplicationStatusHandler {
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
            BUSY => {
                let status = cursor.read_u8()?;
                let wait_seconds = cursor.read_u8()?;
                out.push(EventKind::ApplicationBusy {
                    status,
                    wait_seconds,
                });
            }
            REJECTED_REQUEST => {
                let status = cursor.read_u8()?;
                out.push(EventKind::ApplicationRejected { status });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_class::testing::{decode, handler};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_busy() {
        let mut status = handler::<ApplicationStatusHandler>(1);
        assert_eq!(
            decode(&mut status, &[BUSY, 0x01, 0x1E]),
            vec![EventKind::ApplicationBusy {
                status: 1,
                wait_seconds: 30
            }]
        );
    }

    #[test]
    fn test_decode_rejected() {
        let mut status = handler::<ApplicationStatusHandler>(1);
        assert_eq!(
            decode(&mut status, &[REJECTED_REQUEST, 0x00]),
            vec![EventKind::ApplicationRejected { status: 0 }]
        );
    }
}
