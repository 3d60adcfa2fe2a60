//! Configuration command class (0x70)
//!
//! Parameter values are signed big-endian integers of 1, 2 or 4 bytes.
//! Version 2 adds bulk access, version 3 adds parameter names, info text
//! and properties, version 4 adds a reset to defaults. Names and info text
//! may be split over several reports; the pieces are joined before an event
//! is emitted.

use std::collections::HashMap;

use zwrust_core::{PayloadCursor, SendData, StringEncoding};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const DEFAULT_RESET: u8 = 0x01;
const SET: u8 = 0x04;
const GET: u8 = 0x05;
const REPORT: u8 = 0x06;
const BULK_SET: u8 = 0x07;
const BULK_GET: u8 = 0x08;
const BULK_REPORT: u8 = 0x09;
const NAME_GET: u8 = 0x0A;
const NAME_REPORT: u8 = 0x0B;
const INFO_GET: u8 = 0x0C;
const INFO_REPORT: u8 = 0x0D;
const PROPERTIES_GET: u8 = 0x0E;
const PROPERTIES_REPORT: u8 = 0x0F;

const SIZE_MASK: u8 = 0x07;
const USE_DEFAULT: u8 = 0x80;

fn check_size(size: u8) -> std::result::Result<usize, DecodeError> {
    match size {
        1 | 2 | 4 => Ok(usize::from(size)),
        _ => Err(DecodeError::InvalidField {
            field: "parameter size",
            value: u32::from(size),
        }),
    }
}

fn encode_value(value: i32, size: u8) -> Result<Vec<u8>> {
    let fits = match size {
        1 => i8::try_from(value).is_ok(),
        2 => i16::try_from(value).is_ok(),
        4 => true,
        _ => return Err(Error::InvalidArgument(format!("parameter size {}", size))),
    };
    if !fits {
        return Err(Error::InvalidArgument(format!(
            "value {} does not fit {} bytes",
            value, size
        )));
    }
    Ok(value.to_be_bytes()[4 - usize::from(size)..].to_vec())
}

#[derive(Debug)]
pub struct ConfigurationHandler {
    base: HandlerBase,
    /// Last reported value per parameter
    values: HashMap<u16, i32>,
    /// Name fragments waiting for the final report
    pending_names: HashMap<u16, String>,
    pending_info: HashMap<u16, String>,
}

impl ConfigurationHandler {
    pub fn value(&self, parameter: u16) -> Option<i32> {
        self.values.get(&parameter).copied()
    }

    pub fn encode_get(&self, parameter: u8) -> SendData {
        self.base.message(GET, &[parameter])
    }

    /// Set `parameter` to `value` using `size` bytes
    pub fn encode_set(&self, parameter: u8, value: i32, size: u8) -> Result<SendData> {
        let mut args = vec![parameter, size];
        args.extend(encode_value(value, size)?);
        Ok(self.base.message(SET, &args))
    }

    /// Restore the factory default of one parameter
    pub fn encode_set_default(&self, parameter: u8, size: u8) -> Result<SendData> {
        let width = check_size(size)?;
        let mut args = vec![parameter, USE_DEFAULT | size];
        args.resize(2 + width, 0x00);
        Ok(self.base.message(SET, &args))
    }

    pub fn encode_bulk_get(&self, offset: u16, count: u8) -> Result<SendData> {
        self.base.require_version(BULK_GET, 2)?;
        let [hi, lo] = offset.to_be_bytes();
        Ok(self.base.message(BULK_GET, &[hi, lo, count]))
    }

    /// Set consecutive parameters starting at `offset`, all of `size` bytes
    pub fn encode_bulk_set(&self, offset: u16, values: &[i32], size: u8) -> Result<SendData> {
        self.base.require_version(BULK_SET, 2)?;
        if !matches!(size, 1 | 2 | 4) {
            return Err(Error::InvalidArgument(format!("parameter size {}", size)));
        }
        // offset, count and size precede the values
        let limit = (self.base.max_args() - 4) / usize::from(size);
        if values.len() > limit {
            return Err(Error::InvalidArgument(format!(
                "{} bulk values of {} bytes, at most {} fit",
                values.len(),
                size,
                limit
            )));
        }
        let count = values.len() as u8;
        let [hi, lo] = offset.to_be_bytes();

        let mut args = vec![hi, lo, count, size];
        for value in values {
            args.extend(encode_value(*value, size)?);
        }
        Ok(self.base.message(BULK_SET, &args))
    }

    pub fn encode_name_get(&self, parameter: u16) -> Result<SendData> {
        self.base.require_version(NAME_GET, 3)?;
        Ok(self.base.message(NAME_GET, &parameter.to_be_bytes()))
    }

    pub fn encode_info_get(&self, parameter: u16) -> Result<SendData> {
        self.base.require_version(INFO_GET, 3)?;
        Ok(self.base.message(INFO_GET, &parameter.to_be_bytes()))
    }

    pub fn encode_properties_get(&self, parameter: u16) -> Result<SendData> {
        self.base.require_version(PROPERTIES_GET, 3)?;
        Ok(self.base.message(PROPERTIES_GET, &parameter.to_be_bytes()))
    }

    pub fn encode_default_reset(&self) -> Result<SendData> {
        self.base.require_version(DEFAULT_RESET, 4)?;
        Ok(self.base.message(DEFAULT_RESET, &[]))
    }

    /// Append a text fragment; returns the full text once the last one arrived
    fn accumulate(
        pending: &mut HashMap<u16, String>,
        parameter: u16,
        cursor: &mut PayloadCursor<'_>,
    ) -> std::result::Result<Option<String>, DecodeError> {
        let to_follow = cursor.read_u8()?;
        let fragment = cursor.read_fixed_string(cursor.remaining(), StringEncoding::Utf8)?;

        let text = pending.entry(parameter).or_default();
        text.push_str(&fragment);

        if to_follow > 0 {
            return Ok(None);
        }
        Ok(pending.remove(&parameter))
    }
}

impl HandlerType for ConfigurationHandler {
    const ID: CommandClassId = CommandClassId::Configuration;
    const MAX_VERSION: u8 = 4;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            values: HashMap::new(),
            pending_names: HashMap::new(),
            pending_info: HashMap::new(),
        }
    }
}

impl CommandClassHandler for ConfigurationHandler {
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
                let parameter = u16::from(cursor.read_u8()?);
                let size = cursor.read_u8()? & SIZE_MASK;
                let value = cursor.read_sized(check_size(size)?)?;

                self.values.insert(parameter, value);
                out.push(EventKind::Configuration { parameter, size, value });
            }
            BULK_REPORT => {
                let offset = cursor.read_u16()?;
                let count = cursor.read_u8()?;
                let _reports_to_follow = cursor.read_u8()?;
                let size = cursor.read_u8()? & SIZE_MASK;
                let width = check_size(size)?;

                for index in 0..u16::from(count) {
                    let parameter = offset.wrapping_add(index);
                    let value = cursor.read_sized(width)?;
                    self.values.insert(parameter, value);
                    out.push(EventKind::Configuration { parameter, size, value });
                }
            }
            NAME_REPORT => {
                let parameter = cursor.read_u16()?;
                if let Some(name) = Self::accumulate(&mut self.pending_names, parameter, cursor)? {
                    out.push(EventKind::ConfigurationName { parameter, name });
                }
            }
            INFO_REPORT => {
                let parameter = cursor.read_u16()?;
                if let Some(info) = Self::accumulate(&mut self.pending_info, parameter, cursor)? {
                    out.push(EventKind::ConfigurationInfo { parameter, info });
                }
            }
            PROPERTIES_REPORT => {
                let parameter = cursor.read_u16()?;
                let properties = cursor.read_u8()?;
                let format = (properties >> 3) & 0x07;
                let size = properties & SIZE_MASK;

                // size 0 marks an unassigned parameter without value fields
                let (min, max, default) = if size == 0 {
                    (0, 0, 0)
                } else {
                    let width = check_size(size)?;
                    (
                        cursor.read_sized(width)?,
                        cursor.read_sized(width)?,
                        cursor.read_sized(width)?,
                    )
                };
                let next_parameter = cursor.read_u16()?;

                out.push(EventKind::ConfigurationProperties {
                    parameter,
                    format,
                    size,
                    min,
                    max,
                    default,
                    next_parameter,
                });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
