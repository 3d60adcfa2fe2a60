//! Powerlevel command class (0x73)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const TEST_NODE_SET: u8 = 0x04;
const TEST_NODE_GET: u8 = 0x05;
const TEST_NODE_REPORT: u8 = 0x06;

/// Lowest level: normal power minus 9 dBm
pub const MINUS_9_DBM: u8 = 0x09;

/// Test outcome
pub mod test_status {
    pub const FAILED: u8 = 0x00;
    pub const SUCCESS: u8 = 0x01;
    pub const IN_PROGRESS: u8 = 0x02;
}

#[derive(Debug)]
pub struct PowerLevelHandler {
    base: HandlerBase,
}

impl PowerLevelHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    /// Reduce transmit power by `level` dBm for `timeout` seconds
    pub fn encode_set(&self, level: u8, timeout: u8) -> Result<SendData> {
        check_level(level)?;
        Ok(self.base.message(SET, &[level, timeout]))
    }

    /// Send `frames` test frames to `node_id` at `level`
    pub fn encode_test_node_set(&self, node_id: u8, level: u8, frames: u16) -> Result<SendData> {
        check_level(level)?;
        let [hi, lo] = frames.to_be_bytes();
        Ok(self.base.message(TEST_NODE_SET, &[node_id, level, hi, lo]))
    }

    pub fn encode_test_node_get(&self) -> SendData {
        self.base.message(TEST_NODE_GET, &[])
    }
}

fn check_level(level: u8) -> Result<()> {
    if level > MINUS_9_DBM {
        return Err(Error::InvalidArgument(format!("power level {}", level)));
    }
    Ok(())
}

impl HandlerType for PowerLevelHandler {
    const ID: CommandClassId = CommandClassId::PowerLevel;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for PowerLevelHandler {
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
                let level = cursor.read_u8()?;
                let timeout = cursor.read_u8()?;
                out.push(EventKind::PowerLevel { level, timeout });
            }
            TEST_NODE_REPORT => {
                let node_id = cursor.read_u8()?;
                let status = cursor.read_u8()?;
                let frames_acked = cursor.read_u16()?;
                out.push(EventKind::PowerLevelTest {
                    node_id,
                    status,
                    frames_acked,
                });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
