//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] zwrust_core::Error),

    #[error("Command class error: {0}")]
    Protocol(#[from] zwrust_protocol::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] zwrust_transport::Error),

    #[error("Controller not connected")]
    NotConnected,

    /// Controller never acknowledged the frame
    #[error("No ACK from controller after {attempts} attempts")]
    NoAck { attempts: usize },

    /// Request addressed to an endpoint the node is not known to have
    #[error("Node {node_id} has no endpoint {endpoint}")]
    UnknownEndpoint { node_id: u8, endpoint: u8 },
}

impl Error {
    /// Check if the controller can keep going after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(err) => err.is_recoverable(),
            Self::Protocol(err) => err.is_recoverable(),
            Self::Transport(err) => err.is_recoverable(),
            Self::NoAck { .. } => true,
            Self::NotConnected | Self::UnknownEndpoint { .. } => false,
        }
    }
}
