//! Protection command class (0x75)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const SUPPORTED_GET: u8 = 0x04;
const SUPPORTED_REPORT: u8 = 0x05;

/// Local protection states
pub mod local {
    pub const UNPROTECTED: u8 = 0x00;
    pub const SEQUENCE: u8 = 0x01;
    pub const NO_OPERATION: u8 = 0x02;
}

/// RF protection states (version 2)
pub mod rf {
    pub const UNPROTECTED: u8 = 0x00;
    pub const NO_CONTROL: u8 = 0x01;
    pub const NO_RESPONSE: u8 = 0x02;
}

#[derive(Debug)]
pub struct ProtectionHandler {
    base: HandlerBase,
}

impl ProtectionHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    /// Set protection; the RF state is sent from version 2 on
    pub fn encode_set(&self, local: u8, rf: Option<u8>) -> Result<SendData> {
        match rf {
            Some(rf) => {
                self.base.require_version(SET, 2)?;
                Ok(self.base.message(SET, &[local, rf]))
            }
            None if self.base.version() >= 2 => {
                Ok(self.base.message(SET, &[local, rf::UNPROTECTED]))
            }
            None => Ok(self.base.message(SET, &[local])),
        }
    }

    pub fn encode_supported_get(&self) -> Result<SendData> {
        self.base.require_version(SUPPORTED_GET, 2)?;
        Ok(self.base.message(SUPPORTED_GET, &[]))
    }
}

impl HandlerType for ProtectionHandler {
    const ID: CommandClassId = CommandClassId::Protection;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ProtectionHandler {
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
                let local = cursor.read_u8()? & 0x0F;
                let rf = if self.base.version() >= 2 {
                    Some(cursor.read_u8()? & 0x0F)
                } else {
                    None
                };
                out.push(EventKind::Protection { local, rf });
            }
            SUPPORTED_REPORT => {
                let flags = cursor.read_u8()?;
                let local_states = bitmask_to_list(cursor.read_bytes(2)?, 0);
                let rf_states = bitmask_to_list(cursor.read_bytes(2)?, 0);
                out.push(EventKind::ProtectionSupported {
                    timeout: flags & 0x01 != 0,
                    exclusive_control: flags & 0x02 != 0,
                    local_states,
                    rf_states,
                });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
