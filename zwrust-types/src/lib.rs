//! Type definitions for zwrust
//!
//! Shared vocabulary between the protocol engine and its consumers: command
//! class identifiers, decoded events and fixed-point values.

pub mod command_class;
pub mod decimal;
pub mod error;
pub mod event;
pub mod meter;

pub use command_class::CommandClassId;
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use event::{AlarmReport, Event, EventKind, IndicatorObject, MeterReading, MeterTableValue};
pub use meter::{MeterScale, MeterType, RateType};
