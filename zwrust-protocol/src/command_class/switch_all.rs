//! All Switch command class (0x27)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const ON: u8 = 0x04;
const OFF: u8 = 0x05;

/// Participation in "all on" / "all off" broadcasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SwitchAllMode {
    Excluded = 0x00,
    OffOnly = 0x01,
    OnOnly = 0x02,
    Included = 0xFF,
}

#[derive(Debug)]
pub struct SwitchAllHandler {
    base: HandlerBase,
}

impl SwitchAllHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_set(&self, mode: SwitchAllMode) -> SendData {
        self.base.message(SET, &[mode as u8])
    }

    pub fn encode_on(&self) -> SendData {
        self.base.message(ON, &[])
    }

    pub fn encode_off(&self) -> SendData {
        self.base.message(OFF, &[])
    }
}

impl HandlerType for SwitchAllHandler {
    const ID: CommandClassId = CommandClassId::SwitchAll;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for SwitchAllHandler {
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
                let mode = cursor.read_u8()?;
                out.push(EventKind::SwitchAllMode { mode });
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
