//! Door Lock command class (0x62)

use std::time::Duration;

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const OPERATION_SET: u8 = 0x01;
const OPERATION_GET: u8 = 0x02;
const OPERATION_REPORT: u8 = 0x03;
const CONFIGURATION_SET: u8 = 0x04;
const CONFIGURATION_GET: u8 = 0x05;
const CONFIGURATION_REPORT: u8 = 0x06;

/// Minutes/seconds value meaning "no timeout"
const NO_TIMEOUT: u8 = 0xFE;

/// Door lock modes
pub mod mode {
    pub const UNSECURED: u8 = 0x00;
    pub const UNSECURED_WITH_TIMEOUT: u8 = 0x01;
    pub const INSIDE_UNSECURED: u8 = 0x10;
    pub const INSIDE_UNSECURED_WITH_TIMEOUT: u8 = 0x11;
    pub const OUTSIDE_UNSECURED: u8 = 0x20;
    pub const OUTSIDE_UNSECURED_WITH_TIMEOUT: u8 = 0x21;
    pub const SECURED: u8 = 0xFF;
}

/// Operation types of the configuration
pub mod operation {
    pub const CONSTANT: u8 = 0x01;
    pub const TIMED: u8 = 0x02;
}

/// Door lock configuration request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockConfiguration {
    pub operation_type: u8,
    /// Bitmask of handles 1 to 4
    pub outside_handles: u8,
    pub inside_handles: u8,
    pub timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct DoorLockHandler {
    base: HandlerBase,
}

impl DoorLockHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(OPERATION_GET, &[])
    }

    pub fn encode_set(&self, mode: u8) -> SendData {
        self.base.message(OPERATION_SET, &[mode])
    }

    pub fn encode_configuration_get(&self) -> SendData {
        self.base.message(CONFIGURATION_GET, &[])
    }

    pub fn encode_configuration_set(&self, config: LockConfiguration) -> Result<SendData> {
        if config.outside_handles > 0x0F || config.inside_handles > 0x0F {
            return Err(Error::InvalidArgument("door handle mask".into()));
        }
        let (minutes, seconds) = encode_timeout(config.timeout)?;
        Ok(self.base.message(
            CONFIGURATION_SET,
            &[
                config.operation_type,
                config.outside_handles << 4 | config.inside_handles,
                minutes,
                seconds,
            ],
        ))
    }
}

fn encode_timeout(timeout: Option<Duration>) -> Result<(u8, u8)> {
    let Some(timeout) = timeout else {
        return Ok((NO_TIMEOUT, NO_TIMEOUT));
    };
    let total = timeout.as_secs();
    let minutes = u8::try_from(total / 60)
        .ok()
        .filter(|minutes| *minutes < NO_TIMEOUT)
        .ok_or_else(|| Error::InvalidArgument(format!("lock timeout {}s", total)))?;
    Ok((minutes, (total % 60) as u8))
}

fn decode_timeout(minutes: u8, seconds: u8) -> Option<Duration> {
    if minutes == NO_TIMEOUT && seconds == NO_TIMEOUT {
        return None;
    }
    Some(Duration::from_secs(u64::from(minutes) * 60 + u64::from(seconds)))
}

impl HandlerType for DoorLockHandler {
    const ID: CommandClassId = CommandClassId::DoorLock;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for DoorLockHandler {
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
            OPERATION_REPORT => {
                let mode = cursor.read_u8()?;
                let handles = cursor.read_u8()?;
                let condition = cursor.read_u8()?;
                let minutes = cursor.read_u8()?;
                let seconds = cursor.read_u8()?;
                out.push(EventKind::DoorLock {
                    mode,
                    outside_handles: handles >> 4,
                    inside_handles: handles & 0x0F,
                    condition,
                    timeout: decode_timeout(minutes, seconds),
                });
            }
            CONFIGURATION_REPORT => {
                let operation_type = cursor.read_u8()?;
                let handles = cursor.read_u8()?;
                let minutes = cursor.read_u8()?;
                let seconds = cursor.read_u8()?;
                out.push(EventKind::DoorLockConfiguration {
                    operation_type,
                    outside_handles: handles >> 4,
                    inside_handles: handles & 0x0F,
                    timeout: decode_timeout(minutes, seconds),
                });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
