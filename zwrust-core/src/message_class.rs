//! Serial API message types and message classes

use std::fmt;

use crate::error::{FrameError, MalformedFrame};

/// Message type byte (third byte of every frame)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Unsolicited message or request
    Request = 0x00,

    /// Answer to a request
    Response = 0x01,
}

impl From<MessageType> for u8 {
    fn from(message_type: MessageType) -> u8 {
        message_type as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, FrameError> {
        match value {
            0x00 => Ok(Self::Request),
            0x01 => Ok(Self::Response),
            other => Err(FrameError::Malformed(MalformedFrame::InvalidMessageType(other))),
        }
    }
}

/// Serial API message class (function id)
///
/// Opcodes that are not listed are carried as [`MessageClass::Other`]; a
/// frame with an unknown class is still structurally valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MessageClass {
    SerialApiGetInitData,
    SerialApiApplicationNodeInfo,
    ApplicationCommandHandler,
    GetControllerCapabilities,
    SerialApiSetTimeouts,
    SerialApiGetCapabilities,
    SerialApiSoftReset,
    SendNodeInfo,
    SendData,
    GetVersion,
    SendDataAbort,
    MemoryGetId,
    GetNodeProtocolInfo,
    SetDefault,
    RequestNodeNeighborUpdate,
    ApplicationUpdate,
    AddNodeToNetwork,
    RemoveNodeFromNetwork,
    RequestNodeInfo,
    GetRoutingInfo,
    Other(u8),
}

impl MessageClass {
    /// Opcode byte
    pub fn id(self) -> u8 {
        match self {
            Self::SerialApiGetInitData => 0x02,
            Self::SerialApiApplicationNodeInfo => 0x03,
            Self::ApplicationCommandHandler => 0x04,
            Self::GetControllerCapabilities => 0x05,
            Self::SerialApiSetTimeouts => 0x06,
            Self::SerialApiGetCapabilities => 0x07,
            Self::SerialApiSoftReset => 0x08,
            Self::SendNodeInfo => 0x12,
            Self::SendData => 0x13,
            Self::GetVersion => 0x15,
            Self::SendDataAbort => 0x16,
            Self::MemoryGetId => 0x20,
            Self::GetNodeProtocolInfo => 0x41,
            Self::SetDefault => 0x42,
            Self::RequestNodeNeighborUpdate => 0x48,
            Self::ApplicationUpdate => 0x49,
            Self::AddNodeToNetwork => 0x4A,
            Self::RemoveNodeFromNetwork => 0x4B,
            Self::RequestNodeInfo => 0x60,
            Self::GetRoutingInfo => 0x80,
            Self::Other(id) => id,
        }
    }

    /// Check if the opcode is one this library names
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Get message class name
    pub fn name(self) -> &'static str {
        match self {
            Self::SerialApiGetInitData => "SerialApiGetInitData",
            Self::SerialApiApplicationNodeInfo => "SerialApiApplicationNodeInfo",
            Self::ApplicationCommandHandler => "ApplicationCommandHandler",
            Self::GetControllerCapabilities => "GetControllerCapabilities",
            Self::SerialApiSetTimeouts => "SerialApiSetTimeouts",
            Self::SerialApiGetCapabilities => "SerialApiGetCapabilities",
            Self::SerialApiSoftReset => "SerialApiSoftReset",
            Self::SendNodeInfo => "SendNodeInfo",
            Self::SendData => "SendData",
            Self::GetVersion => "GetVersion",
            Self::SendDataAbort => "SendDataAbort",
            Self::MemoryGetId => "MemoryGetId",
            Self::GetNodeProtocolInfo => "GetNodeProtocolInfo",
            Self::SetDefault => "SetDefault",
            Self::RequestNodeNeighborUpdate => "RequestNodeNeighborUpdate",
            Self::ApplicationUpdate => "ApplicationUpdate",
            Self::AddNodeToNetwork => "AddNodeToNetwork",
            Self::RemoveNodeFromNetwork => "RemoveNodeFromNetwork",
            Self::RequestNodeInfo => "RequestNodeInfo",
            Self::GetRoutingInfo => "GetRoutingInfo",
            Self::Other(_) => "Unknown",
        }
    }
}

impl From<MessageClass> for u8 {
    fn from(class: MessageClass) -> u8 {
        class.id()
    }
}

impl From<u8> for MessageClass {
    fn from(value: u8) -> Self {
        match value {
            0x02 => Self::SerialApiGetInitData,
            0x03 => Self::SerialApiApplicationNodeInfo,
            0x04 => Self::ApplicationCommandHandler,
            0x05 => Self::GetControllerCapabilities,
            0x06 => Self::SerialApiSetTimeouts,
            0x07 => Self::SerialApiGetCapabilities,
            0x08 => Self::SerialApiSoftReset,
            0x12 => Self::SendNodeInfo,
            0x13 => Self::SendData,
            0x15 => Self::GetVersion,
            0x16 => Self::SendDataAbort,
            0x20 => Self::MemoryGetId,
            0x41 => Self::GetNodeProtocolInfo,
            0x42 => Self::SetDefault,
            0x48 => Self::RequestNodeNeighborUpdate,
            0x49 => Self::ApplicationUpdate,
            0x4A => Self::AddNodeToNetwork,
            0x4B => Self::RemoveNodeFromNetwork,
            0x60 => Self::RequestNodeInfo,
            0x80 => Self::GetRoutingInfo,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.id())
    }
}
