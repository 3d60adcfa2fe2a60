//! Time command class (0x8A)

use chrono::{NaiveDate, NaiveTime};
use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const TIME_GET: u8 = 0x01;
const TIME_REPORT: u8 = 0x02;
const DATE_GET: u8 = 0x03;
const DATE_REPORT: u8 = 0x04;

const RTC_FAILURE: u8 = 0x80;

#[derive(Debug)]
pub struct TimeHandler {
    base: HandlerBase,
}

impl TimeHandler {
    pub fn encode_time_get(&self) -> SendData {
        self.base.message(TIME_GET, &[])
    }

    pub fn encode_date_get(&self) -> SendData {
        self.base.message(DATE_GET, &[])
    }
}

impl HandlerType for TimeHandler {
    const ID: CommandClassId = CommandClassId::Time;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for TimeHandler {
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
            TIME_REPORT => {
                let first = cursor.read_u8()?;
                let minute = cursor.read_u8()?;
                let second = cursor.read_u8()?;
                let hour = first & 0x1F;

                let time = NaiveTime::from_hms_opt(hour.into(), minute.into(), second.into())
                    .ok_or(DecodeError::InvalidField {
                        field: "time",
                        value: u32::from_be_bytes([0, hour, minute, second]),
                    })?;
                out.push(EventKind::Time {
                    time,
                    rtc_failure: first & RTC_FAILURE != 0,
                });
            }
            DATE_REPORT => {
                let year = cursor.read_u16()?;
                let month = cursor.read_u8()?;
                let day = cursor.read_u8()?;

                let date = NaiveDate::from_ymd_opt(year.into(), month.into(), day.into()).ok_or(
                    DecodeError::InvalidField {
                        field: "date",
                        value: u32::from_be_bytes([(year >> 8) as u8, year as u8, month, day]),
                    },
                )?;
                out.push(EventKind::Date { date });
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
    fn test_time_report() {
        let mut time = handler::<TimeHandler>(1);
        assert_eq!(payload(&time.encode_time_get()), vec![0x8A, 0x01]);
        assert_eq!(
            decode(&mut time, &[TIME_REPORT, 0x8C, 0x1E, 0x2D]),
            vec![EventKind::Time {
                time: NaiveTime::from_hms_opt(12, 30, 45).unwrap(),
                rtc_failure: true
            }]
        );
    }

    #[test]
    fn test_date_report() {
        let mut time = handler::<TimeHandler>(1);
        assert_eq!(
            decode(&mut time, &[DATE_REPORT, 0x07, 0xE8, 0x02, 0x1D]),
            vec![EventKind::Date {
                date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            }]
        );
        assert!(decode(&mut time, &[DATE_REPORT, 0x07, 0xE7, 0x02, 0x1D]).is_empty());
    }
}
