//! Serial API frame structure and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    constants::SOF,
    error::{FrameError, MalformedFrame},
    message_class::{MessageClass, MessageType},
};

/// Serial API data frame
///
/// # Frame Structure
///
/// ```text
/// ┌──────┬──────────┬──────────┬──────────┬─────────────┬──────────┐
/// │ SOF  │  Length  │   Type   │  Class   │   Payload   │ Checksum │
/// │ 0x01 │  1 byte  │  1 byte  │  1 byte  │   N bytes   │  1 byte  │
/// └──────┴──────────┴──────────┴──────────┴─────────────┴──────────┘
/// ```
///
/// `Length` counts every byte after itself, checksum included. The checksum
/// covers length through payload (see [`checksum::calculate`]).
///
/// # Examples
///
/// ```
/// use zwrust_core::{Frame, MessageClass, MessageType};
///
/// // Basic Get to node 99, no transmit options, no callback
/// let frame = Frame::new(
///     MessageType::Request,
///     MessageClass::SendData,
///     vec![0x63, 0x02, 0x20, 0x02, 0x00, 0x00],
/// );
/// let encoded = frame.encode();
/// assert_eq!(
///     &encoded[..],
///     &[0x01, 0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00, 0xA6]
/// );
///
/// let decoded = Frame::parse(&encoded).unwrap();
/// assert_eq!(frame, decoded);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Request or response
    pub message_type: MessageType,

    /// Serial API function
    pub message_class: MessageClass,

    /// Function specific data
    pub payload: Bytes,
}

impl Frame {
    /// SOF + length + type + class + checksum
    pub const OVERHEAD: usize = 5;

    /// Smallest frame on the wire (no payload)
    pub const MIN_SIZE: usize = Self::OVERHEAD;

    /// Largest payload the one-byte length field can describe
    pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize - 3;

    /// Create a frame with payload
    pub fn new(
        message_type: MessageType,
        message_class: MessageClass,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            message_type,
            message_class,
            payload: payload.into(),
        }
    }

    /// Create a request frame
    pub fn request(message_class: MessageClass, payload: impl Into<Bytes>) -> Self {
        Self::new(MessageType::Request, message_class, payload)
    }

    /// Create a response frame
    pub fn response(message_class: MessageClass, payload: impl Into<Bytes>) -> Self {
        Self::new(MessageType::Response, message_class, payload)
    }

    /// Build a frame, refusing payloads the length byte cannot describe
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PayloadTooLarge`] above [`Frame::MAX_PAYLOAD_SIZE`].
    pub fn build(
        message_type: MessageType,
        message_class: MessageClass,
        payload: impl Into<Bytes>,
    ) -> Result<Self, FrameError> {
        let payload = payload.into();
        if payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self::new(message_type, message_class, payload))
    }

    /// Value of the length byte
    pub fn length_field(&self) -> u8 {
        // type + class + payload + checksum
        (self.payload.len() + 3) as u8
    }

    /// Calculate checksum for this frame
    pub fn checksum(&self) -> u8 {
        let mut body = Vec::with_capacity(self.payload.len() + 3);
        body.push(self.length_field());
        body.push(self.message_type.into());
        body.push(self.message_class.into());
        body.extend_from_slice(&self.payload);

        checksum::calculate(&body)
    }

    /// Encode frame to bytes
    ///
    /// Payloads above [`Frame::MAX_PAYLOAD_SIZE`] cannot be described by the
    /// length byte; use [`Frame::build`] to reject them up front.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(SOF);
        buf.put_u8(self.length_field());
        buf.put_u8(self.message_type.into());
        buf.put_u8(self.message_class.into());
        buf.put_slice(&self.payload);

        let checksum = checksum::calculate(&buf[1..]);
        buf.put_u8(checksum);

        buf
    }

    /// Parse and validate a frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than [`Frame::MIN_SIZE`]
    /// - First byte is not SOF
    /// - Length byte does not match the buffer
    /// - Message type is not request/response
    /// - Checksum verification fails
    ///
    /// Unknown message classes are not an error.
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < Self::MIN_SIZE {
            return Err(FrameError::Malformed(MalformedFrame::TooShort {
                expected: Self::MIN_SIZE,
                actual: bytes.len(),
            }));
        }

        if bytes[0] != SOF {
            return Err(FrameError::Malformed(MalformedFrame::MissingStartOfFrame(
                bytes[0],
            )));
        }

        let declared = usize::from(bytes[1]);
        let actual = bytes.len() - 2;
        if declared != actual {
            return Err(FrameError::Malformed(MalformedFrame::LengthMismatch {
                declared,
                actual,
            }));
        }

        let checksum_index = bytes.len() - 1;
        let received = bytes[checksum_index];
        let expected = checksum::calculate(&bytes[1..checksum_index]);
        if expected != received {
            return Err(FrameError::ChecksumMismatch { expected, received });
        }

        let message_type = MessageType::try_from(bytes[2])?;
        let message_class = MessageClass::from(bytes[3]);
        let payload = Bytes::copy_from_slice(&bytes[4..checksum_index]);

        Ok(Self {
            message_type,
            message_class,
            payload,
        })
    }

    /// Check whether `bytes` is one complete, valid frame
    pub fn is_valid(bytes: &[u8]) -> bool {
        Self::parse(bytes).is_ok()
    }

    /// Check if this is a request
    pub fn is_request(&self) -> bool {
        self.message_type == MessageType::Request
    }

    /// Check if this is a response
    pub fn is_response(&self) -> bool {
        self.message_type == MessageType::Response
    }

    /// Get total frame size on the wire
    pub fn size(&self) -> usize {
        Self::OVERHEAD + self.payload.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("message_type", &self.message_type)
            .field("message_class", &self.message_class)
            .field("checksum", &format!("0x{:02X}", self.checksum()))
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{:?} {}](len={})",
            self.message_type,
            self.message_class,
            self.payload.len()
        )
    }
}
