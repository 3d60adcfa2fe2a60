//! # zwrust-core
//!
//! Core serial API implementation for Z-Wave controllers.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - XOR checksum and CRC-16 calculation
//! - Message class definitions
//! - Bounds-checked payload cursor
//! - SendData / ApplicationCommandHandler payload layouts
//! - Protocol constants

pub mod callback;
pub mod checksum;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod frame;
pub mod message;
pub mod message_class;

pub use callback::CallbackIds;
pub use constants::TransmitOptions;
pub use cursor::{CursorResult, PayloadCursor, StringEncoding};
pub use error::{CursorError, Error, FrameError, MalformedFrame, Result};
pub use frame::Frame;
pub use message::{
    ApplicationCommand, NodeInfo, SendData, SendDataCallback, SendDataResponse, TransmitStatus,
};
pub use message_class::{MessageClass, MessageType};
