//! # zwrust-protocol
//!
//! Command class engine for Z-Wave controllers.
//!
//! This crate turns application command payloads into typed events and
//! builds outbound requests:
//! - Command class handlers with per-node version negotiation
//! - Registry of handler constructors keyed by class id
//! - Node and endpoint directory
//! - Dispatcher that follows Multi Channel and CRC-16 encapsulation
//! - Event sinks

pub mod command_class;
pub mod dispatcher;
pub mod error;
pub mod node;
pub mod registry;
pub mod sink;

pub use command_class::{CommandClassHandler, HandlerContext, HandlerType};
pub use dispatcher::{Dispatcher, MAX_ENCAPSULATION_DEPTH};
pub use error::{DecodeError, Error, Result};
pub use node::{Endpoint, Node, NodeDirectory};
pub use registry::{HandlerFactory, Registration, Registry};
pub use sink::{EventSink, NullSink, RecordingSink};
