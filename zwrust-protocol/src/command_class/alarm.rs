//! Alarm / Notification command class (0x71)
//!
//! Version 1 reports only a vendor alarm type and level. Version 2 renamed
//! the class to Notification and appended standardized fields:
//!
//! ```text
//! v1: [type][level]
//! v2: [type][level][source][status][notification type][event]
//!     [sequenced:1 | reserved:2 | params length:5][params...][sequence?]
//! ```
//!
//! Many devices negotiate version 2 or later but still send the short
//! layout, so a report that ends after the level is read as version 1.

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{AlarmReport, CommandClassId, EventKind};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const EVENT_SUPPORTED_GET: u8 = 0x01;
const EVENT_SUPPORTED_REPORT: u8 = 0x02;
const GET: u8 = 0x04;
const REPORT: u8 = 0x05;
const SET: u8 = 0x06;
const SUPPORTED_GET: u8 = 0x07;
const SUPPORTED_REPORT: u8 = 0x08;

const SEQUENCED: u8 = 0x80;
const LENGTH_MASK: u8 = 0x1F;

/// Request the first pending notification of any type
pub const PENDING_NOTIFICATION: u8 = 0xFF;

/// Standard notification types
pub mod notification {
    pub const SMOKE: u8 = 0x01;
    pub const CARBON_MONOXIDE: u8 = 0x02;
    pub const CARBON_DIOXIDE: u8 = 0x03;
    pub const HEAT: u8 = 0x04;
    pub const WATER: u8 = 0x05;
    pub const ACCESS_CONTROL: u8 = 0x06;
    pub const HOME_SECURITY: u8 = 0x07;
    pub const POWER_MANAGEMENT: u8 = 0x08;
    pub const SYSTEM: u8 = 0x09;
    pub const EMERGENCY: u8 = 0x0A;
    pub const CLOCK: u8 = 0x0B;
}

#[derive(Debug)]
pub struct AlarmHandler {
    base: HandlerBase,
}

impl AlarmHandler {
    /// Request a report
    ///
    /// Version 1 asks for a vendor `alarm_type`. From version 2 on the
    /// request names a notification type, and from version 3 an event
    /// within it.
    pub fn encode_get(&self, alarm_type: u8, notification_type: u8, event: u8) -> SendData {
        let args: &[u8] = match self.base.version() {
            1 => &[alarm_type],
            2 => &[alarm_type, notification_type],
            _ => &[alarm_type, notification_type, event],
        };
        self.base.message(GET, args)
    }

    /// Enable or disable unsolicited reports of `notification_type`
    pub fn encode_set(&self, notification_type: u8, enabled: bool) -> Result<SendData> {
        self.base.require_version(SET, 2)?;
        let status = if enabled { 0xFF } else { 0x00 };
        Ok(self.base.message(SET, &[notification_type, status]))
    }

    pub fn encode_supported_get(&self) -> Result<SendData> {
        self.base.require_version(SUPPORTED_GET, 2)?;
        Ok(self.base.message(SUPPORTED_GET, &[]))
    }

    pub fn encode_event_supported_get(&self, notification_type: u8) -> Result<SendData> {
        self.base.require_version(EVENT_SUPPORTED_GET, 3)?;
        Ok(self.base.message(EVENT_SUPPORTED_GET, &[notification_type]))
    }

    fn read_report(&self, cursor: &mut PayloadCursor<'_>) -> std::result::Result<AlarmReport, DecodeError> {
        let mut report = AlarmReport {
            alarm_type: cursor.read_u8()?,
            alarm_level: cursor.read_u8()?,
            ..AlarmReport::default()
        };

        if self.base.version() < 2 || cursor.is_empty() {
            return Ok(report);
        }

        let source = cursor.read_u8()?;
        report.source_node = Some(source).filter(|node| *node != 0);
        report.notification_status = Some(cursor.read_u8()?);
        report.notification_type = Some(cursor.read_u8()?);
        report.event = Some(cursor.read_u8()?);

        if cursor.is_empty() {
            return Ok(report);
        }
        let properties = cursor.read_u8()?;
        let len = usize::from(properties & LENGTH_MASK);
        report.event_params = cursor.read_bytes(len)?.to_vec();
        if properties & SEQUENCED != 0 {
            report.sequence = Some(cursor.read_u8()?);
        }

        Ok(report)
    }
}

impl HandlerType for AlarmHandler {
    const ID: CommandClassId = CommandClassId::Alarm;
    const MAX_VERSION: u8 = 8;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for AlarmHandler {
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
                let report = self.read_report(cursor)?;
                out.push(EventKind::Alarm(report));
            }
            SUPPORTED_REPORT => {
                let properties = cursor.read_u8()?;
                let len = usize::from(properties & LENGTH_MASK);
                let notification_types = bitmask_to_list(cursor.read_bytes(len)?, 0);
                out.push(EventKind::AlarmTypesSupported {
                    v1_alarm: properties & 0x80 != 0,
                    notification_types,
                });
            }
            EVENT_SUPPORTED_REPORT => {
                let notification_type = cursor.read_u8()?;
                let len = usize::from(cursor.read_u8()? & LENGTH_MASK);
                let events = bitmask_to_list(cursor.read_bytes(len)?, 0);
                out.push(EventKind::AlarmEventsSupported {
                    notification_type,
                    events,
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
    fn test_decode_v1_report() {
        let mut alarm = handler::<AlarmHandler>(1);
        assert_eq!(
            decode(&mut alarm, &[REPORT, 0x15, 0x01, 0x00, 0xFF, 0x06, 0x16]),
            vec![EventKind::Alarm(AlarmReport {
                alarm_type: 0x15,
                alarm_level: 0x01,
                ..AlarmReport::default()
            })]
        );
    }

    #[test]
    fn test_decode_notification_report() {
        let mut alarm = handler::<AlarmHandler>(3);
        assert_eq!(
            decode(&mut alarm, &[REPORT, 0x00, 0x00, 0x00, 0xFF, 0x07, 0x08, 0x00]),
            vec![EventKind::Alarm(AlarmReport {
                alarm_type: 0,
                alarm_level: 0,
                source_node: None,
                notification_status: Some(0xFF),
                notification_type: Some(notification::HOME_SECURITY),
                event: Some(0x08),
                event_params: vec![],
                sequence: None,
            })]
        );
    }

    #[test]
    fn test_decode_params_and_sequence() {
        let mut alarm = handler::<AlarmHandler>(8);
        let report = [REPORT, 0x00, 0x00, 0x00, 0xFF, 0x06, 0x06, 0x82, 0x63, 0x03, 0x2A];
        let events = decode(&mut alarm, &report);

        let EventKind::Alarm(alarm) = &events[0] else {
            panic!("unexpected event {:?}", events);
        };
        assert_eq!(alarm.notification_type, Some(notification::ACCESS_CONTROL));
        assert_eq!(alarm.event_params, vec![0x63, 0x03]);
        assert_eq!(alarm.sequence, Some(0x2A));
    }

    #[test]
    fn test_short_report_at_v2() {
        let mut alarm = handler::<AlarmHandler>(2);
        assert_eq!(
            decode(&mut alarm, &[REPORT, 0x01, 0xFF]),
            vec![EventKind::Alarm(AlarmReport {
                alarm_type: 1,
                alarm_level: 0xFF,
                ..AlarmReport::default()
            })]
        );
    }

    #[test]
    fn test_truncated_params() {
        let mut alarm = handler::<AlarmHandler>(3);
        let report = [REPORT, 0x00, 0x00, 0x00, 0xFF, 0x06, 0x06, 0x04, 0x63];
        assert!(decode(&mut alarm, &report).is_empty());
    }

    #[test]
    fn test_encode_get_per_version() {
        assert_eq!(
            payload(&handler::<AlarmHandler>(1).encode_get(0x15, 0x06, 0x00)),
            vec![0x71, 0x04, 0x15]
        );
        assert_eq!(
            payload(&handler::<AlarmHandler>(2).encode_get(0x00, 0x06, 0x00)),
            vec![0x71, 0x04, 0x00, 0x06]
        );
        assert_eq!(
            payload(&handler::<AlarmHandler>(3).encode_get(0x00, PENDING_NOTIFICATION, 0x00)),
            vec![0x71, 0x04, 0x00, 0xFF, 0x00]
        );
    }

    #[test]
    fn test_supported_reports() {
        let mut alarm = handler::<AlarmHandler>(3);
        assert_eq!(
            decode(&mut alarm, &[SUPPORTED_REPORT, 0x81, 0xC0]),
            vec![EventKind::AlarmTypesSupported {
                v1_alarm: true,
                notification_types: vec![6, 7]
            }]
        );
        assert_eq!(
            decode(&mut alarm, &[EVENT_SUPPORTED_REPORT, 0x07, 0x02, 0x00, 0x01]),
            vec![EventKind::AlarmEventsSupported {
                notification_type: 7,
                events: vec![8]
            }]
        );
        assert!(handler::<AlarmHandler>(2).encode_event_supported_get(7).is_err());
    }
}
