//! # zwrust
//!
//! Rust implementation of the Z-Wave serial API and command class engine.
//!
//! ## Features
//!
//! - Bit-exact serial API framing with checksum validation
//! - 44 command class handlers with per-node version negotiation
//! - Multi Channel and CRC-16 encapsulation
//! - Async/await controller API using Tokio
//! - Events delivered to any [`EventSink`], including a tokio channel
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use zwrust::{ChannelSink, Controller};
//! use zwrust::command_class::SwitchBinaryHandler;
//!
//! #[tokio::main]
//! async fn main() -> zwrust::Result<()> {
//!     let (sink, mut events) = ChannelSink::new();
//!     let mut controller = Controller::new("192.168.1.40", 4001).with_sink(Arc::new(sink));
//!     controller.connect().await?;
//!
//!     // Switch node 5 on
//!     controller
//!         .request::<SwitchBinaryHandler, _>(5, 0, |switch| Ok(switch.encode_set(true, None)))
//!         .await?;
//!
//!     controller.poll().await?;
//!     while let Ok(event) = events.try_recv() {
//!         println!("{}", event);
//!     }
//!
//!     controller.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod sink;

// Re-exports
pub use config::ControllerConfig;
pub use controller::Controller;
pub use error::{Error, Result};
pub use sink::ChannelSink;

// Re-export the engine
pub use zwrust_core::{Frame, SendData, TransmitOptions};
pub use zwrust_protocol::{
    Dispatcher, EventSink, NodeDirectory, RecordingSink, Registry, command_class,
};
pub use zwrust_types::{CommandClassId, Event, EventKind};
