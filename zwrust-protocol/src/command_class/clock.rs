//! Clock command class (0x81)
//!
//! ```text
//! [weekday:3 | hour:5][minute]
//! ```
//!
//! Weekday 1 is Monday, 0 means the device does not track the day.

use chrono::{NaiveTime, Timelike, Weekday};
use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const SET: u8 = 0x04;
const GET: u8 = 0x05;
const REPORT: u8 = 0x06;

fn weekday_from_wire(value: u8) -> Option<Weekday> {
    match value {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

#[derive(Debug)]
pub struct ClockHandler {
    base: HandlerBase,
}

impl ClockHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    /// Set the device clock; seconds are not transmitted
    pub fn encode_set(&self, weekday: Option<Weekday>, time: NaiveTime) -> SendData {
        let day = weekday.map_or(0, |day| day.number_from_monday() as u8);
        self.base
            .message(SET, &[day << 5 | time.hour() as u8, time.minute() as u8])
    }
}

impl HandlerType for ClockHandler {
    const ID: CommandClassId = CommandClassId::Clock;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for ClockHandler {
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
                let first = cursor.read_u8()?;
                let minute = cursor.read_u8()?;
                let hour = first & 0x1F;

                let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0).ok_or(
                    DecodeError::InvalidField {
                        field: "clock time",
                        value: u32::from(hour) << 8 | u32::from(minute),
                    },
                )?;
                out.push(EventKind::Clock {
                    weekday: weekday_from_wire(first >> 5),
                    time,
                });
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
