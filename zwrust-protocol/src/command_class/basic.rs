//! Basic command class (0x20)
//!
//! Every device maps Basic onto its primary function, so this is the
//! fallback for devices nothing else is known about.

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;

#[derive(Debug)]
pub struct BasicHandler {
    base: HandlerBase,
}

impl BasicHandler {
    /// Request the current value
    ///
    /// # Examples
    ///
    /// ```
    /// use zwrust_protocol::command_class::{BasicHandler, HandlerContext, HandlerType};
    ///
    /// let basic = BasicHandler::new(HandlerContext::root(99));
    /// let frame = basic.encode_get().into_frame().unwrap();
    /// assert_eq!(
    ///     &frame.encode()[..],
    ///     &[0x01, 0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00, 0xA6]
    /// );
    /// ```
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_set(&self, value: u8) -> SendData {
        self.base.message(SET, &[value])
    }
}

impl HandlerType for BasicHandler {
    const ID: CommandClassId = CommandClassId::Basic;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for BasicHandler {
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
            // A Set from a device is an unsolicited state change
            REPORT | SET => {
                let value = cursor.read_u8()?;
                out.push(EventKind::Basic { value });
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
