//! Time Parameters command class (0x8B)
//!
//! Date and time are always UTC:
//!
//! ```text
//! [year:16][month][day][hour][minute][second]
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;

#[derive(Debug)]
pub struct TimeParametersHandler {
    base: HandlerBase,
}

impl TimeParametersHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_set(&self, timestamp: NaiveDateTime) -> Result<SendData> {
        let year = u16::try_from(timestamp.year())
            .map_err(|_| Error::InvalidArgument(format!("year {}", timestamp.year())))?;
        let [hi, lo] = year.to_be_bytes();
        Ok(self.base.message(
            SET,
            &[
                hi,
                lo,
                timestamp.month() as u8,
                timestamp.day() as u8,
                timestamp.hour() as u8,
                timestamp.minute() as u8,
                timestamp.second() as u8,
            ],
        ))
    }
}

impl HandlerType for TimeParametersHandler {
    const ID: CommandClassId = CommandClassId::TimeParameters;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for TimeParametersHandler {
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
                let year = cursor.read_u16()?;
                let fields = cursor.read_bytes(5)?;

                let timestamp = NaiveDate::from_ymd_opt(year.into(), fields[0].into(), fields[1].into())
                    .and_then(|date| {
                        date.and_hms_opt(fields[2].into(), fields[3].into(), fields[4].into())
                    })
                    .ok_or(DecodeError::InvalidField {
                        field: "timestamp",
                        value: u32::from(year),
                    })?;
                out.push(EventKind::TimeParameters { timestamp });
                Ok(())
            }
            _ => self.base.ignore(command),
        }
    }
}
