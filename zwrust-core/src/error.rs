//! Error types for zwrust-core

use std::fmt;

/// Result type alias for zwrust-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Structural problems found while parsing a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedFrame {
    /// Fewer bytes than the smallest possible frame
    TooShort { expected: usize, actual: usize },

    /// First byte is not the start-of-frame marker
    MissingStartOfFrame(u8),

    /// Length byte disagrees with the number of bytes received
    LengthMismatch { declared: usize, actual: usize },

    /// Message type is neither request nor response
    InvalidMessageType(u8),
}

impl fmt::Display for MalformedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected, actual } => write!(
                f,
                "frame too short: expected at least {} bytes, got {}",
                expected, actual
            ),
            Self::MissingStartOfFrame(byte) => {
                write!(f, "missing start of frame, got 0x{:02X}", byte)
            }
            Self::LengthMismatch { declared, actual } => write!(
                f,
                "length mismatch: declared {} bytes, received {}",
                declared, actual
            ),
            Self::InvalidMessageType(byte) => write!(f, "invalid message type 0x{:02X}", byte),
        }
    }
}

/// Frame level errors
///
/// Always recoverable: the frame is discarded and the reader waits for the
/// next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Frame structure is broken
    #[error("Malformed frame: {0}")]
    Malformed(MalformedFrame),

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch { expected: u8, received: u8 },

    /// Payload does not fit the one-byte length field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },
}

/// Payload cursor errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// A read asked for more bytes than remain
    #[error("Out of bounds read: requested {requested} bytes, {available} available")]
    OutOfBounds { requested: usize, available: usize },
}

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// Frame carries a different message class than the parser expected
    #[error("Unexpected message class: expected {expected}, got {actual}")]
    UnexpectedMessageClass {
        expected: crate::MessageClass,
        actual: crate::MessageClass,
    },

    /// Field value outside of what the protocol allows
    #[error("Invalid {field}: {value}")]
    InvalidField { field: &'static str, value: usize },
}

impl Error {
    /// Check if dropping the current frame and reading on is enough
    ///
    /// `InvalidField` comes from bad caller input when building a message;
    /// retrying the same input fails the same way.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Frame(_) | Self::Cursor(_) | Self::UnexpectedMessageClass { .. }
        )
    }
}
