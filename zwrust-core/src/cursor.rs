//! Bounds-checked payload reader
//!
//! Every command class decoder reads through a [`PayloadCursor`]. A read that
//! would run past the end of the payload fails with
//! [`CursorError::OutOfBounds`] and leaves the cursor where it was, so a
//! truncated frame surfaces as one error type instead of a panic.

use byteorder::{BigEndian, ByteOrder};

use crate::error::CursorError;

/// Result type for cursor reads
pub type CursorResult<T> = std::result::Result<T, CursorError>;

/// Character encodings used by text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEncoding {
    /// 7-bit ASCII, other bytes replaced
    Ascii,
    /// OEM extended ASCII, read as Latin-1
    ExtendedAscii,
    Utf8,
    /// UTF-16, big-endian code units
    Utf16Be,
}

impl StringEncoding {
    /// Map the Node Naming "char presentation" field
    pub fn from_char_presentation(value: u8) -> Self {
        match value & 0x07 {
            0x01 => Self::ExtendedAscii,
            0x02 => Self::Utf16Be,
            _ => Self::Ascii,
        }
    }
}

/// Sequential reader over a payload slice
#[derive(Debug, Clone)]
pub struct PayloadCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> PayloadCursor<'a> {
    /// Create a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Check if everything has been read
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, width: usize) -> CursorResult<&'a [u8]> {
        let available = self.remaining();
        if width > available {
            return Err(CursorError::OutOfBounds {
                requested: width,
                available,
            });
        }

        let bytes = &self.data[self.offset..self.offset + width];
        self.offset += width;
        Ok(bytes)
    }

    /// Look at the next byte without consuming it
    pub fn peek_u8(&self) -> CursorResult<u8> {
        self.data
            .get(self.offset)
            .copied()
            .ok_or(CursorError::OutOfBounds {
                requested: 1,
                available: 0,
            })
    }

    pub fn read_u8(&mut self) -> CursorResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> CursorResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Big-endian u16
    pub fn read_u16(&mut self) -> CursorResult<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    /// Big-endian i16
    pub fn read_i16(&mut self) -> CursorResult<i16> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    /// Big-endian 24-bit unsigned
    pub fn read_u24(&mut self) -> CursorResult<u32> {
        Ok(BigEndian::read_u24(self.take(3)?))
    }

    /// Big-endian u32
    pub fn read_u32(&mut self) -> CursorResult<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Big-endian i32
    pub fn read_i32(&mut self) -> CursorResult<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    /// Signed big-endian integer of `size` bytes
    ///
    /// Sizes other than 1, 2 and 4 are read as that many bytes and
    /// sign-extended; a size of 0 reads nothing and yields 0.
    pub fn read_sized(&mut self, size: usize) -> CursorResult<i32> {
        let bytes = self.take(size)?;
        Ok(match size {
            0 => 0,
            1 => i32::from(bytes[0] as i8),
            2 => i32::from(BigEndian::read_i16(bytes)),
            4 => BigEndian::read_i32(bytes),
            _ => {
                let width = size.min(4);
                let raw = BigEndian::read_uint(&bytes[size - width..], width) as u32;
                let shift = 32 - 8 * width as u32;
                ((raw << shift) as i32) >> shift
            }
        })
    }

    /// Unsigned big-endian integer of `size` bytes (at most 4)
    pub fn read_sized_unsigned(&mut self, size: usize) -> CursorResult<u32> {
        let bytes = self.take(size)?;
        if size == 0 {
            return Ok(0);
        }
        let width = size.min(4);
        Ok(BigEndian::read_uint(&bytes[size - width..], width) as u32)
    }

    /// Borrow the next `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> CursorResult<&'a [u8]> {
        self.take(n)
    }

    /// Borrow everything that is left
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.offset..];
        self.offset = self.data.len();
        bytes
    }

    /// Read a fixed-width text field of `n` bytes
    ///
    /// Trailing NUL bytes are dropped. Invalid sequences are replaced rather
    /// than rejected.
    pub fn read_fixed_string(&mut self, n: usize, encoding: StringEncoding) -> CursorResult<String> {
        let bytes = self.take(n)?;
        Ok(decode_string(bytes, encoding))
    }
}

/// Decode a text field, trimming trailing NULs
pub fn decode_string(bytes: &[u8], encoding: StringEncoding) -> String {
    let text = match encoding {
        StringEncoding::Ascii => bytes
            .iter()
            .map(|b| if b.is_ascii() { char::from(*b) } else { '?' })
            .collect(),
        StringEncoding::ExtendedAscii => bytes.iter().map(|b| char::from(*b)).collect(),
        StringEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        StringEncoding::Utf16Be => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
    };

    text.trim_end_matches('\0').to_string()
}
