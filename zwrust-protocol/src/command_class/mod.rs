//! Command class handlers
//!
//! A handler is bound to one (node, endpoint, class) tuple. It owns the
//! negotiated version and whatever partial state a class accumulates across
//! reports. Decoding goes through [`CommandClassHandler::decode_payload`]:
//! the command id byte picks the sub-parser, and a cursor error aborts the
//! rest of the call without losing the events already built.
//!
//! Encoding is done through inherent methods on each handler type
//! (`encode_get`, `encode_set`, ...) which return a [`SendData`] request
//! addressed to the handler's node. Requests for an endpoint other than the
//! root are Multi Channel encapsulated.

use std::any::Any;
use std::fmt;

use bytes::{BufMut, BytesMut};
use tracing::{debug, warn};
use zwrust_core::{Frame, PayloadCursor, SendData};
use zwrust_types::{CommandClassId, Event, EventKind};

use crate::error::{DecodeError, Error, Result};

pub mod value;

pub mod alarm;
pub mod application_status;
pub mod association;
pub mod association_group_info;
pub mod barrier_operator;
pub mod basic;
pub mod battery;
pub mod central_scene;
pub mod clock;
pub mod color;
pub mod configuration;
pub mod crc16;
pub mod device_reset_locally;
pub mod door_lock;
pub mod hail;
pub mod indicator;
pub mod lock;
pub mod manufacturer_specific;
pub mod meter;
pub mod meter_table_monitor;
pub mod multi_channel_association;
pub mod multi_instance;
pub mod no_operation;
pub mod node_naming;
pub mod power_level;
pub mod protection;
pub mod scene_activation;
pub mod sensor_alarm;
pub mod sensor_binary;
pub mod sensor_multilevel;
pub mod switch_all;
pub mod switch_binary;
pub mod switch_multilevel;
pub mod thermostat_fan_mode;
pub mod thermostat_fan_state;
pub mod thermostat_mode;
pub mod thermostat_operating_state;
pub mod thermostat_setpoint;
pub mod time;
pub mod time_parameters;
pub mod user_code;
pub mod version;
pub mod wake_up;
pub mod zwave_plus_info;

pub use alarm::AlarmHandler;
pub use application_status::ApplicationStatusHandler;
pub use association::AssociationHandler;
pub use association_group_info::{AssociationGroupInfoHandler, GroupInfo};
pub use barrier_operator::BarrierOperatorHandler;
pub use basic::BasicHandler;
pub use battery::BatteryHandler;
pub use central_scene::CentralSceneHandler;
pub use clock::ClockHandler;
pub use color::ColorHandler;
pub use configuration::ConfigurationHandler;
pub use crc16::Crc16Handler;
pub use device_reset_locally::DeviceResetLocallyHandler;
pub use door_lock::DoorLockHandler;
pub use hail::HailHandler;
pub use indicator::IndicatorHandler;
pub use lock::LockHandler;
pub use manufacturer_specific::ManufacturerSpecificHandler;
pub use meter::MeterHandler;
pub use meter_table_monitor::MeterTableMonitorHandler;
pub use multi_channel_association::MultiChannelAssociationHandler;
pub use multi_instance::MultiInstanceHandler;
pub use no_operation::NoOperationHandler;
pub use node_naming::NodeNamingHandler;
pub use power_level::PowerLevelHandler;
pub use protection::ProtectionHandler;
pub use scene_activation::SceneActivationHandler;
pub use sensor_alarm::SensorAlarmHandler;
pub use sensor_binary::SensorBinaryHandler;
pub use sensor_multilevel::SensorMultilevelHandler;
pub use switch_all::SwitchAllHandler;
pub use switch_binary::SwitchBinaryHandler;
pub use switch_multilevel::SwitchMultilevelHandler;
pub use thermostat_fan_mode::ThermostatFanModeHandler;
pub use thermostat_fan_state::ThermostatFanStateHandler;
pub use thermostat_mode::ThermostatModeHandler;
pub use thermostat_operating_state::ThermostatOperatingStateHandler;
pub use thermostat_setpoint::ThermostatSetpointHandler;
pub use time::TimeHandler;
pub use time_parameters::TimeParametersHandler;
pub use user_code::UserCodeHandler;
pub use version::VersionHandler;
pub use wake_up::WakeUpHandler;
pub use zwave_plus_info::ZwavePlusInfoHandler;

/// Multi Channel command encapsulation opcode
const MULTI_CHANNEL_ENCAP: u8 = 0x0D;

/// Where a handler lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerContext {
    pub node_id: u8,
    /// 0 = root device
    pub endpoint: u8,
}

impl HandlerContext {
    pub fn new(node_id: u8, endpoint: u8) -> Self {
        Self { node_id, endpoint }
    }

    /// Root device of a node
    pub fn root(node_id: u8) -> Self {
        Self::new(node_id, 0)
    }
}

/// A nested command found inside an encapsulating command
///
/// `payload` starts at the nested class id byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub endpoint: u8,
    pub payload: &'a [u8],
}

/// What one decode call produced
#[derive(Debug, Default)]
pub struct DecodeOutput<'a> {
    pub events: Vec<EventKind>,
    pub envelopes: Vec<Envelope<'a>>,
}

impl<'a> DecodeOutput<'a> {
    pub fn push(&mut self, kind: EventKind) {
        self.events.push(kind);
    }

    pub fn forward(&mut self, endpoint: u8, payload: &'a [u8]) {
        self.envelopes.push(Envelope { endpoint, payload });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.envelopes.is_empty()
    }
}

/// State every handler carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerBase {
    class: CommandClassId,
    context: HandlerContext,
    version: u8,
    max_version: u8,
}

impl HandlerBase {
    /// New handler state at version 1
    pub fn new(class: CommandClassId, context: HandlerContext, max_version: u8) -> Self {
        Self {
            class,
            context,
            version: 1,
            max_version: max_version.max(1),
        }
    }

    pub fn class(&self) -> CommandClassId {
        self.class
    }

    pub fn context(&self) -> HandlerContext {
        self.context
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn max_version(&self) -> u8 {
        self.max_version
    }

    /// Clamp into `1..=max_version`
    pub fn set_version(&mut self, version: u8) {
        self.version = version.clamp(1, self.max_version);
    }

    /// Fail unless the negotiated version offers `command`
    pub fn require_version(&self, command: u8, required: u8) -> Result<()> {
        if self.version < required {
            return Err(Error::UnsupportedCommand {
                class: self.class,
                command,
                required,
                version: self.version,
            });
        }
        Ok(())
    }

    /// Build a request carrying `[class][command][args...]`
    /// Largest argument list [`HandlerBase::message`] can fit in one frame
    pub fn max_args(&self) -> usize {
        // node, len, transmit options, callback id, class, command
        let overhead = 6 + if self.context.endpoint > 0 { 4 } else { 0 };
        Frame::MAX_PAYLOAD_SIZE - overhead
    }

    pub fn message(&self, command: u8, args: &[u8]) -> SendData {
        let mut payload = BytesMut::with_capacity(args.len() + 6);
        if self.context.endpoint > 0 {
            payload.put_u8(CommandClassId::MultiInstance.id());
            payload.put_u8(MULTI_CHANNEL_ENCAP);
            payload.put_u8(0x00);
            payload.put_u8(self.context.endpoint);
        }
        payload.put_u8(self.class.id());
        payload.put_u8(command);
        payload.put_slice(args);

        SendData::new(self.context.node_id, payload.freeze())
    }

    /// Log and skip a command the handler does not decode
    pub fn ignore(&self, command: u8) -> std::result::Result<(), DecodeError> {
        debug!(
            node_id = self.context.node_id,
            endpoint = self.context.endpoint,
            class = %self.class,
            command,
            "Ignoring command"
        );
        Ok(())
    }
}

/// Downcasting support for boxed handlers
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A command class handler bound to one node endpoint
pub trait CommandClassHandler: AsAny + Send + fmt::Debug {
    fn base(&self) -> &HandlerBase;

    fn base_mut(&mut self) -> &mut HandlerBase;

    /// Decode the body of `command`
    ///
    /// The cursor sits right after the command id. Unknown commands should
    /// go through [`HandlerBase::ignore`].
    fn handle<'a>(
        &mut self,
        command: u8,
        cursor: &mut PayloadCursor<'a>,
        out: &mut DecodeOutput<'a>,
    ) -> std::result::Result<(), DecodeError>;

    fn id(&self) -> CommandClassId {
        self.base().class()
    }

    fn node_id(&self) -> u8 {
        self.base().context().node_id
    }

    fn endpoint(&self) -> u8 {
        self.base().context().endpoint
    }

    fn version(&self) -> u8 {
        self.base().version()
    }

    fn max_version(&self) -> u8 {
        self.base().max_version()
    }

    /// Switch field layouts to `version` (clamped to what is implemented)
    fn set_version(&mut self, version: u8) {
        self.base_mut().set_version(version);
    }

    /// Read the command id and decode the rest of the payload
    fn decode_payload<'a>(&mut self, cursor: &mut PayloadCursor<'a>) -> DecodeOutput<'a> {
        let mut out = DecodeOutput::default();

        let command = match cursor.read_u8() {
            Ok(command) => command,
            Err(_) => {
                debug!(node_id = self.node_id(), class = %self.id(), "Command without command id");
                return out;
            }
        };

        if let Err(err) = self.handle(command, cursor, &mut out) {
            warn!(
                node_id = self.node_id(),
                endpoint = self.endpoint(),
                class = %self.id(),
                command,
                error = %err,
                decoded = out.events.len(),
                "Decode aborted"
            );
        }

        out
    }

    /// Decode into events tagged with `endpoint`
    ///
    /// Nested commands are not followed here; the dispatcher does that.
    fn decode(&mut self, cursor: &mut PayloadCursor<'_>, endpoint: u8) -> Vec<Event> {
        let node_id = self.node_id();
        let class = self.id();

        self.decode_payload(cursor)
            .events
            .into_iter()
            .map(|kind| Event::new(node_id, endpoint, class, kind))
            .collect()
    }
}

/// Handlers the registry can construct by type
pub trait HandlerType: CommandClassHandler + Sized + 'static {
    const ID: CommandClassId;
    const MAX_VERSION: u8;

    fn new(context: HandlerContext) -> Self;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for handler unit tests

    use super::*;

    /// Decode `payload` (starting at the command id) on a fresh handler
    pub fn decode<T: HandlerType>(handler: &mut T, payload: &[u8]) -> Vec<EventKind> {
        let mut cursor = PayloadCursor::new(payload);
        handler.decode_payload(&mut cursor).events
    }

    /// Handler for node 3, root endpoint, at `version`
    pub fn handler<T: HandlerType>(version: u8) -> T {
        let mut handler = T::new(HandlerContext::root(3));
        handler.set_version(version);
        handler
    }

    /// Command bytes of a request (`[class][command][args...]`)
    pub fn payload(request: &SendData) -> Vec<u8> {
        request.payload.to_vec()
    }
}
