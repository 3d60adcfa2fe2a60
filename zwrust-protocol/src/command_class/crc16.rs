//! CRC-16 Encapsulation command class (0x56)
//!
//! ```text
//! [0x56][0x01][class][command][args...][crc:16]
//! ```
//!
//! The CRC covers everything before it, the 0x56 0x01 header included. The
//! nested command is handed back to the dispatcher on the same endpoint.

use bytes::{BufMut, BytesMut};
use zwrust_core::{checksum, PayloadCursor, SendData};
use zwrust_types::CommandClassId;

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const ENCAP: u8 = 0x01;

/// Class id plus command id
const MIN_NESTED_LEN: usize = 2;

#[derive(Debug)]
pub struct Crc16Handler {
    base: HandlerBase,
}

impl Crc16Handler {
    /// Checksum of an encapsulated command
    pub fn checksum(nested: &[u8]) -> u16 {
        let mut covered = Vec::with_capacity(nested.len() + 2);
        covered.push(CommandClassId::Crc16Encap.id());
        covered.push(ENCAP);
        covered.extend_from_slice(nested);
        checksum::crc16(&covered)
    }

    /// Wrap `nested` (`[class][command][args...]`) with a CRC
    pub fn encapsulate(&self, nested: &[u8]) -> SendData {
        let mut args = BytesMut::with_capacity(nested.len() + 2);
        args.put_slice(nested);
        args.put_u16(Self::checksum(nested));
        self.base.message(ENCAP, &args)
    }
}

impl HandlerType for Crc16Handler {
    const ID: CommandClassId = CommandClassId::Crc16Encap;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for Crc16Handler {
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
        if command != ENCAP {
            return self.base.ignore(command);
        }

        let available = cursor.remaining();
        if available < MIN_NESTED_LEN + 2 {
            return Err(DecodeError::from(zwrust_core::CursorError::OutOfBounds {
                requested: MIN_NESTED_LEN + 2,
                available,
            }));
        }

        let nested = cursor.read_bytes(available - 2)?;
        let received = cursor.read_u16()?;
        let expected = Self::checksum(nested);
        if expected != received {
            return Err(DecodeError::CrcMismatch { expected, received });
        }

        out.forward(self.endpoint(), nested);
        Ok(())
    }
}
