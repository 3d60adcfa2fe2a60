//! Error types for zwrust-protocol

use zwrust_core::CursorError;
use zwrust_types::CommandClassId;

/// Result type alias for zwrust-protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding one command
///
/// These never leave the engine: a decode call that hits one logs it and
/// returns the events it had already built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// Field holds a value the class does not define
    #[error("Invalid {field}: {value}")]
    InvalidField { field: &'static str, value: u32 },

    /// CRC-16 encapsulation checksum did not match
    #[error("CRC mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    CrcMismatch { expected: u16, received: u16 },
}

/// Protocol engine errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] zwrust_core::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Sub-command is not available at the negotiated version
    #[error("{class} command 0x{command:02X} requires version {required}, negotiated version is {version}")]
    UnsupportedCommand {
        class: CommandClassId,
        command: u8,
        required: u8,
        version: u8,
    },

    /// Caller supplied a value the command cannot carry
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Check if the error only affects the current frame or request
    ///
    /// Caller errors (wrong version, bad argument) fail the same way on retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(err) => err.is_recoverable(),
            Self::Decode(_) => true,
            Self::UnsupportedCommand { .. } | Self::InvalidArgument(_) => false,
        }
    }
}
