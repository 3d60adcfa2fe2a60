//! Protocol constants

/// Start of frame
pub const SOF: u8 = 0x01;

/// Frame received and checksum ok
pub const ACK: u8 = 0x06;

/// Frame received but checksum failed
pub const NAK: u8 = 0x15;

/// Frame dropped, controller busy (collision)
pub const CAN: u8 = 0x18;

/// Default ACK timeout (milliseconds)
pub const DEFAULT_ACK_TIMEOUT_MS: u64 = 1600;

/// Default read timeout (seconds)
pub const DEFAULT_READ_TIMEOUT: u64 = 5;

/// Maximum retransmissions after NAK/CAN/timeout
pub const MAX_RETRIES: usize = 3;

/// Highest valid node id on a classic network
pub const MAX_NODE_ID: u8 = 232;

/// Broadcast node id
pub const BROADCAST_NODE_ID: u8 = 0xFF;

bitflags::bitflags! {
    /// SendData transmit options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransmitOptions: u8 {
        /// Request an acknowledgement from the destination
        const ACK = 0x01;
        /// Transmit at reduced power
        const LOW_POWER = 0x02;
        /// Let the controller pick a route if direct transmission fails
        const AUTO_ROUTE = 0x04;
        /// Direct transmission only
        const NO_ROUTE = 0x10;
        /// Allow explorer frames
        const EXPLORE = 0x20;
    }
}

impl TransmitOptions {
    /// Options a controller uses for ordinary traffic
    pub const fn standard() -> Self {
        Self::ACK.union(Self::AUTO_ROUTE).union(Self::EXPLORE)
    }
}

impl Default for TransmitOptions {
    fn default() -> Self {
        Self::empty()
    }
}

/// Receive status flags in ApplicationCommandHandler frames
pub mod receive_status {
    /// Frame was routed (busy)
    pub const ROUTED_BUSY: u8 = 0x01;

    /// Received at low power
    pub const LOW_POWER: u8 = 0x02;

    /// Broadcast frame
    pub const BROADCAST: u8 = 0x04;

    /// Multicast frame
    pub const MULTICAST: u8 = 0x08;
}

/// ApplicationUpdate status codes
pub mod update_state {
    pub const SUC_ID: u8 = 0x10;
    pub const DELETE_DONE: u8 = 0x20;
    pub const NEW_ID_ASSIGNED: u8 = 0x40;
    pub const ROUTING_PENDING: u8 = 0x80;
    pub const NODE_INFO_REQ_FAILED: u8 = 0x81;
    pub const NODE_INFO_REQ_DONE: u8 = 0x82;
    pub const NODE_INFO_RECEIVED: u8 = 0x84;
}
