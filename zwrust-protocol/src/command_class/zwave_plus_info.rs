//! Z-Wave Plus Info command class (0x5E)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const GET: u8 = 0x01;
const REPORT: u8 = 0x02;

#[derive(Debug)]
pub struct ZwavePlusInfoHandler {
    base: HandlerBase,
}

impl ZwavePlusInfoHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }
}

impl HandlerType for ZwavePlusInfoHandler {
    const ID: CommandClassId = CommandClassId::ZwavePlusInfo;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ZwavePlusInfoHandler {
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
                let version = cursor.read_u8()?;
                let role_type = cursor.read_u8()?;
                let node_type = cursor.read_u8()?;
                let installer_icon = cursor.read_u16()?;
                let user_icon = cursor.read_u16()?;
                out.push(EventKind::ZwavePlusInfo {
                    version,
                    role_type,
                    node_type,
                    installer_icon,
                    user_icon,
                });
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
        let mut info = handler::<ZwavePlusInfoHandler>(2);
        assert_eq!(payload(&info.encode_get()), vec![0x5E, 0x01]);
        assert_eq!(
            decode(&mut info, &[REPORT, 0x01, 0x05, 0x00, 0x07, 0x00, 0x07, 0x01]),
            vec![EventKind::ZwavePlusInfo {
                version: 1,
                role_type: 5,
                node_type: 0,
                installer_icon: 0x0700,
                user_icon: 0x0701
            }]
        );
    }

    #[test]
    fn test_truncated_report() {
        let mut info = handler::<ZwavePlusInfoHandler>(2);
        assert!(decode(&mut info, &[REPORT, 0x01, 0x05]).is_empty());
    }
}
