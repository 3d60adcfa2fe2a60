//! Wake Up command class (0x84)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const INTERVAL_SET: u8 = 0x04;
const INTERVAL_GET: u8 = 0x05;
const INTERVAL_REPORT: u8 = 0x06;
const NOTIFICATION: u8 = 0x07;
const NO_MORE_INFORMATION: u8 = 0x08;
const CAPABILITIES_GET: u8 = 0x09;
const CAPABILITIES_REPORT: u8 = 0x0A;

/// Largest interval a 24-bit field can carry
pub const MAX_INTERVAL: u32 = 0x00FF_FFFF;

#[derive(Debug)]
pub struct WakeUpHandler {
    base: HandlerBase,
    interval: Option<u32>,
    /// The node is awake and accepting commands
    awake: bool,
}

impl WakeUpHandler {
    pub fn interval(&self) -> Option<u32> {
        self.interval
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    pub fn encode_interval_get(&self) -> SendData {
        self.base.message(INTERVAL_GET, &[])
    }

    /// Wake up every `seconds` and notify `target_node`
    pub fn encode_interval_set(&self, seconds: u32, target_node: u8) -> Result<SendData> {
        if seconds > MAX_INTERVAL {
            return Err(Error::InvalidArgument(format!("wake up interval {}s", seconds)));
        }
        let [_, hi, mid, lo] = seconds.to_be_bytes();
        Ok(self.base.message(INTERVAL_SET, &[hi, mid, lo, target_node]))
    }

    /// Tell the node it may go back to sleep
    pub fn encode_no_more_information(&mut self) -> SendData {
        self.awake = false;
        self.base.message(NO_MORE_INFORMATION, &[])
    }

    pub fn encode_capabilities_get(&self) -> Result<SendData> {
        self.base.require_version(CAPABILITIES_GET, 2)?;
        Ok(self.base.message(CAPABILITIES_GET, &[]))
    }
}

impl HandlerType for WakeUpHandler {
    const ID: CommandClassId = CommandClassId::WakeUp;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            interval: None,
            awake: false,
        }
    }
}

impl CommandClassHandler for WakeUpHandler {
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
            INTERVAL_REPORT => {
                let seconds = cursor.read_u24()?;
                let target_node = cursor.read_u8()?;
                self.interval = Some(seconds);
                out.push(EventKind::WakeUpInterval { seconds, target_node });
            }
            NOTIFICATION => {
                self.awake = true;
                out.push(EventKind::WakeUpNotification);
            }
            CAPABILITIES_REPORT => {
                let minimum = cursor.read_u24()?;
                let maximum = cursor.read_u24()?;
                let default = cursor.read_u24()?;
                let step = cursor.read_u24()?;
                out.push(EventKind::WakeUpCapabilities {
                    minimum,
                    maximum,
                    default,
                    step,
                });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_class::testing::{decode, handler, payload};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_interval_round_trip() {
        let mut wake = handler::<WakeUpHandler>(1);
        let request = wake.encode_interval_set(3600, 1).unwrap();
        assert_eq!(payload(&request), vec![0x84, 0x04, 0x00, 0x0E, 0x10, 0x01]);

        let mut report = vec![INTERVAL_REPORT];
        report.extend_from_slice(&request.payload[2..]);
        assert_eq!(
            decode(&mut wake, &report),
            vec![EventKind::WakeUpInterval {
                seconds: 3600,
                target_node: 1
            }]
        );
        assert_eq!(wake.interval(), Some(3600));
        assert!(wake.encode_interval_set(MAX_INTERVAL + 1, 1).is_err());
    }

    #[test]
    fn test_notification_marks_awake() {
        let mut wake = handler::<WakeUpHandler>(1);
        assert_eq!(decode(&mut wake, &[NOTIFICATION]), vec![EventKind::WakeUpNotification]);
        assert!(wake.is_awake());

        assert_eq!(payload(&wake.encode_no_more_information()), vec![0x84, 0x08]);
        assert!(!wake.is_awake());
    }

    #[test]
    fn test_capabilities() {
        let mut wake = handler::<WakeUpHandler>(2);
        assert_eq!(
            decode(
                &mut wake,
                &[
                    CAPABILITIES_REPORT,
                    0x00, 0x00, 0x3C,
                    0x01, 0x51, 0x80,
                    0x00, 0x0E, 0x10,
                    0x00, 0x00, 0x3C,
                ]
            ),
            vec![EventKind::WakeUpCapabilities {
                minimum: 60,
                maximum: 86_400,
                default: 3600,
                step: 60
            }]
        );
        assert!(handler::<WakeUpHandler>(1).encode_capabilities_get().is_err());
    }
}
