//! Transport layer for Z-Wave serial interfaces
//!
//! Provides byte transport to a controller and a deframer that splits the
//! serial stream into frames and control bytes.

pub mod error;
pub mod framer;
pub mod tcp;

pub use error::{Error, Result};
pub use framer::{FrameReader, SerialItem};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte transport to a Z-Wave controller
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the connection
    async fn connect(&mut self) -> Result<()>;

    /// Close the connection
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Write raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read whatever bytes are available (with timeout)
    ///
    /// The chunk may hold a partial frame or several frames; feed it to a
    /// [`FrameReader`].
    async fn receive(&mut self, timeout_secs: u64) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
