//! Field encodings shared by several command classes

use std::time::Duration;

use zwrust_core::PayloadCursor;
use zwrust_types::Decimal;

use crate::error::{DecodeError, Error, Result};

/// Duration byte value meaning "factory default" in Set commands
pub const DURATION_DEFAULT: u8 = 0xFF;

/// Decode a duration byte
///
/// 0 is instant, 1-127 seconds, 128-254 minutes (1-127), 255 unknown.
pub fn parse_duration(byte: u8) -> Option<Duration> {
    match byte {
        0x00..=0x7F => Some(Duration::from_secs(u64::from(byte))),
        0x80..=0xFE => Some(Duration::from_secs(u64::from(byte - 0x7F) * 60)),
        0xFF => None,
    }
}

/// Encode a duration into its byte form
///
/// Anything above 127 seconds is rounded up to whole minutes and capped at
/// 127 minutes.
pub fn encode_duration(duration: Duration) -> u8 {
    let seconds = duration.as_secs();
    if seconds <= 0x7F {
        return seconds as u8;
    }

    let minutes = seconds.div_ceil(60).min(0x7F);
    0x7F + minutes as u8
}

/// Values of the bits set in a bitmask
///
/// Bit `n` of byte `i` stands for `offset + 8 * i + n`.
pub fn bitmask_to_list(bytes: &[u8], offset: u8) -> Vec<u8> {
    let mut values = Vec::new();
    for (index, byte) in bytes.iter().enumerate() {
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                let value = usize::from(offset) + index * 8 + bit;
                if let Ok(value) = u8::try_from(value) {
                    values.push(value);
                }
            }
        }
    }
    values
}

/// Inverse of [`bitmask_to_list`]
pub fn list_to_bitmask(values: &[u8], offset: u8, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    for value in values.iter().filter(|v| **v >= offset) {
        let position = usize::from(value - offset);
        if let Some(byte) = bytes.get_mut(position / 8) {
            *byte |= 1 << (position % 8);
        }
    }
    bytes
}

/// A precision/scale/size prefixed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledValue {
    pub scale: u8,
    pub value: Decimal,
}

impl ScaledValue {
    const PRECISION_SHIFT: u8 = 5;
    const SCALE_SHIFT: u8 = 3;
    const SIZE_MASK: u8 = 0x07;

    /// Read `[precision:3|scale:2|size:3][value...]`
    pub fn read(cursor: &mut PayloadCursor<'_>) -> std::result::Result<Self, DecodeError> {
        let properties = cursor.read_u8()?;
        Self::read_with(cursor, properties)
    }

    /// Read the value once the properties byte is known
    pub fn read_with(
        cursor: &mut PayloadCursor<'_>,
        properties: u8,
    ) -> std::result::Result<Self, DecodeError> {
        let size = properties & Self::SIZE_MASK;
        if !matches!(size, 1 | 2 | 4) {
            return Err(DecodeError::InvalidField {
                field: "value size",
                value: u32::from(size),
            });
        }

        let precision = properties >> Self::PRECISION_SHIFT;
        let scale = (properties >> Self::SCALE_SHIFT) & 0x03;
        let raw = cursor.read_sized(usize::from(size))?;

        Ok(Self {
            scale,
            value: Decimal::new(i64::from(raw), precision),
        })
    }

    /// Properties byte followed by the big-endian value
    pub fn encode(&self) -> Result<Vec<u8>> {
        let size = self.value.wire_size().ok_or_else(|| {
            Error::InvalidArgument(format!("{} does not fit in 4 bytes", self.value))
        })?;
        if self.value.precision() > 7 || self.scale > 3 {
            return Err(Error::InvalidArgument(format!(
                "precision {} / scale {} out of range",
                self.value.precision(),
                self.scale
            )));
        }

        let properties =
            (self.value.precision() << Self::PRECISION_SHIFT) | (self.scale << Self::SCALE_SHIFT) | size;
        let mantissa = self.value.mantissa();

        let mut bytes = vec![properties];
        match size {
            1 => bytes.push(mantissa as i8 as u8),
            2 => bytes.extend_from_slice(&(mantissa as i16).to_be_bytes()),
            _ => bytes.extend_from_slice(&(mantissa as i32).to_be_bytes()),
        }
        Ok(bytes)
    }
}

/// Decode text whose trailing bytes may be padding
pub fn read_text(cursor: &mut PayloadCursor<'_>) -> String {
    zwrust_core::cursor::decode_string(cursor.read_remaining(), zwrust_core::StringEncoding::Utf8)
}
