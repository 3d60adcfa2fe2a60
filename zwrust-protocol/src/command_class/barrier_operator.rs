//! Barrier Operator command class (0x66)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const SIGNAL_SUPPORTED_GET: u8 = 0x04;
const SIGNAL_SUPPORTED_REPORT: u8 = 0x05;
const SIGNAL_SET: u8 = 0x06;
const SIGNAL_GET: u8 = 0x07;
const SIGNAL_REPORT: u8 = 0x08;

/// Barrier states; 0x01 to 0x63 are partial positions
pub mod state {
    pub const CLOSED: u8 = 0x00;
    pub const CLOSING: u8 = 0xFC;
    pub const STOPPED: u8 = 0xFD;
    pub const OPENING: u8 = 0xFE;
    pub const OPEN: u8 = 0xFF;
}

/// Notification subsystems
pub mod subsystem {
    pub const AUDIBLE: u8 = 0x01;
    pub const VISUAL: u8 = 0x02;
}

#[derive(Debug)]
pub struct BarrierOperatorHandler {
    base: HandlerBase,
}

impl BarrierOperatorHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_set(&self, open: bool) -> SendData {
        let target = if open { state::OPEN } else { state::CLOSED };
        self.base.message(SET, &[target])
    }

    pub fn encode_signal_supported_get(&self) -> SendData {
        self.base.message(SIGNAL_SUPPORTED_GET, &[])
    }

    pub fn encode_signal_set(&self, subsystem: u8, on: bool) -> Result<SendData> {
        if subsystem == 0 {
            return Err(Error::InvalidArgument("barrier subsystem 0".into()));
        }
        let value = if on { 0xFF } else { 0x00 };
        Ok(self.base.message(SIGNAL_SET, &[subsystem, value]))
    }

    pub fn encode_signal_get(&self, subsystem: u8) -> SendData {
        self.base.message(SIGNAL_GET, &[subsystem])
    }
}

impl HandlerType for BarrierOperatorHandler {
    const ID: CommandClassId = CommandClassId::BarrierOperator;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for BarrierOperatorHandler {
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
                let state = cursor.read_u8()?;
                out.push(EventKind::BarrierState { state });
            }
            SIGNAL_SUPPORTED_REPORT => {
                let subsystems = bitmask_to_list(cursor.read_remaining(), 1);
                out.push(EventKind::BarrierSignalsSupported { subsystems });
            }
            SIGNAL_REPORT => {
                let subsystem = cursor.read_u8()?;
                let state = cursor.read_u8()?;
                out.push(EventKind::BarrierSignal { subsystem, state });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
