//! Domain events produced by decoding application commands
//!
//! An [`Event`] is immutable once built. It carries the addressing
//! information (node, endpoint, command class) plus an [`EventKind`] holding
//! the class specific fields. Raw numeric codes are kept where the protocol
//! leaves the meaning open (vendor alarm types, thermostat modes, ...);
//! interpreting them is left to consumers.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::command_class::CommandClassId;
use crate::decimal::Decimal;
use crate::meter::{MeterScale, MeterType, RateType};

/// A decoded value event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Node the command came from
    pub node_id: u8,

    /// Endpoint (0 = root device)
    pub endpoint: u8,

    /// Command class that produced the event
    pub command_class: CommandClassId,

    /// Class specific content
    pub kind: EventKind,
}

impl Event {
    pub fn new(node_id: u8, endpoint: u8, command_class: CommandClassId, kind: EventKind) -> Self {
        Self {
            node_id,
            endpoint,
            command_class,
            kind,
        }
    }

    /// Same event re-addressed to another endpoint
    pub fn with_endpoint(mut self, endpoint: u8) -> Self {
        self.endpoint = endpoint;
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event[node={}, endpoint={}, class={}]: {:?}",
            self.node_id, self.endpoint, self.command_class, self.kind
        )
    }
}

/// Meter report content
#[derive(Debug, Clone, PartialEq)]
pub struct MeterReading {
    pub meter_type: MeterType,
    pub rate_type: RateType,
    pub scale: MeterScale,
    pub value: Decimal,
    /// Seconds since the previous reading (version 2 and later)
    pub delta_time: Option<u16>,
    pub previous_value: Option<Decimal>,
}

/// Alarm / Notification report content
///
/// Version 1 devices fill only `alarm_type` and `alarm_level`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlarmReport {
    pub alarm_type: u8,
    pub alarm_level: u8,
    pub source_node: Option<u8>,
    pub notification_status: Option<u8>,
    pub notification_type: Option<u8>,
    pub event: Option<u8>,
    pub event_params: Vec<u8>,
    pub sequence: Option<u8>,
}

/// One value slot of a Meter Table Monitor current-data report
#[derive(Debug, Clone, PartialEq)]
pub struct MeterTableValue {
    /// Dataset bit the value belongs to
    pub dataset: u8,
    pub scale: u8,
    pub value: Decimal,
}

/// Indicator version 2 object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorObject {
    pub indicator: u8,
    pub property: u8,
    pub value: u8,
}

/// Class specific event content
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Basic {
        value: u8,
    },
    ApplicationBusy {
        status: u8,
        wait_seconds: u8,
    },
    ApplicationRejected {
        status: u8,
    },
    SwitchBinary {
        value: u8,
        target: Option<u8>,
        duration: Option<Duration>,
    },
    SwitchMultilevel {
        value: u8,
        target: Option<u8>,
        duration: Option<Duration>,
    },
    SwitchMultilevelSupported {
        primary: u8,
        secondary: u8,
    },
    SwitchAllMode {
        mode: u8,
    },
    SceneActivation {
        scene_id: u8,
        duration: Option<Duration>,
    },
    SensorBinary {
        sensor_type: Option<u8>,
        value: u8,
    },
    SensorBinarySupported {
        sensor_types: Vec<u8>,
    },
    SensorMultilevel {
        sensor_type: u8,
        scale: u8,
        value: Decimal,
    },
    SensorMultilevelSupported {
        sensor_types: Vec<u8>,
    },
    SensorMultilevelScales {
        sensor_type: u8,
        scales: Vec<u8>,
    },
    Meter(MeterReading),
    MeterSupported {
        meter_type: MeterType,
        can_reset: bool,
        scales: Vec<MeterScale>,
    },
    Color {
        component: u8,
        value: u8,
        target: Option<u8>,
        duration: Option<Duration>,
    },
    ColorSupported {
        components: Vec<u8>,
    },
    MeterTableId {
        id: String,
    },
    MeterTablePointAdm {
        number: String,
    },
    MeterTableCapability {
        meter_type: MeterType,
        rate_type: RateType,
        pay_meter: u8,
        datasets: u32,
    },
    MeterTableCurrentData {
        rate_type: RateType,
        datasets: u32,
        timestamp: Option<NaiveDateTime>,
        values: Vec<MeterTableValue>,
    },
    ThermostatMode {
        mode: u8,
    },
    ThermostatModesSupported {
        modes: Vec<u8>,
    },
    ThermostatOperatingState {
        state: u8,
    },
    ThermostatSetpoint {
        setpoint_type: u8,
        scale: u8,
        value: Decimal,
    },
    ThermostatSetpointsSupported {
        setpoint_types: Vec<u8>,
    },
    ThermostatFanMode {
        mode: u8,
        off: bool,
    },
    ThermostatFanModesSupported {
        modes: Vec<u8>,
    },
    ThermostatFanState {
        state: u8,
    },
    AssociationGroupName {
        group: u8,
        name: String,
    },
    AssociationGroupProfile {
        group: u8,
        profile: u16,
        event_code: u16,
        dynamic: bool,
    },
    AssociationGroupCommands {
        group: u8,
        commands: Vec<(u8, u8)>,
    },
    DeviceResetLocally,
    CentralScene {
        scene: u8,
        key_attribute: u8,
        sequence: u8,
    },
    CentralSceneSupported {
        scenes: u8,
    },
    CentralSceneConfiguration {
        slow_refresh: bool,
    },
    ZwavePlusInfo {
        version: u8,
        role_type: u8,
        node_type: u8,
        installer_icon: u16,
        user_icon: u16,
    },
    MultiInstanceCount {
        command_class: u8,
        instances: u8,
    },
    MultiChannelEndpoints {
        dynamic: bool,
        identical: bool,
        count: u8,
    },
    MultiChannelCapability {
        endpoint: u8,
        dynamic: bool,
        generic_class: u8,
        specific_class: u8,
        command_classes: Vec<u8>,
    },
    MultiChannelEndpointsFound {
        generic_class: u8,
        specific_class: u8,
        endpoints: Vec<u8>,
    },
    DoorLock {
        mode: u8,
        outside_handles: u8,
        inside_handles: u8,
        condition: u8,
        timeout: Option<Duration>,
    },
    DoorLockConfiguration {
        operation_type: u8,
        outside_handles: u8,
        inside_handles: u8,
        timeout: Option<Duration>,
    },
    UserCode {
        user_id: u8,
        status: u8,
        code: String,
    },
    UserCodeCount {
        count: u8,
    },
    BarrierState {
        state: u8,
    },
    BarrierSignalsSupported {
        subsystems: Vec<u8>,
    },
    BarrierSignal {
        subsystem: u8,
        state: u8,
    },
    Configuration {
        parameter: u16,
        size: u8,
        value: i32,
    },
    ConfigurationName {
        parameter: u16,
        name: String,
    },
    ConfigurationInfo {
        parameter: u16,
        info: String,
    },
    ConfigurationProperties {
        parameter: u16,
        format: u8,
        size: u8,
        min: i32,
        max: i32,
        default: i32,
        next_parameter: u16,
    },
    Alarm(AlarmReport),
    AlarmTypesSupported {
        v1_alarm: bool,
        notification_types: Vec<u8>,
    },
    AlarmEventsSupported {
        notification_type: u8,
        events: Vec<u8>,
    },
    ManufacturerSpecific {
        manufacturer_id: u16,
        device_type: u16,
        device_id: u16,
    },
    DeviceSpecific {
        id_type: u8,
        id: String,
    },
    PowerLevel {
        level: u8,
        timeout: u8,
    },
    PowerLevelTest {
        node_id: u8,
        status: u8,
        frames_acked: u16,
    },
    Protection {
        local: u8,
        rf: Option<u8>,
    },
    ProtectionSupported {
        timeout: bool,
        exclusive_control: bool,
        local_states: Vec<u8>,
        rf_states: Vec<u8>,
    },
    Lock {
        locked: bool,
    },
    NodeName {
        name: String,
    },
    NodeLocation {
        location: String,
    },
    Battery {
        level: u8,
        low: bool,
    },
    Clock {
        weekday: Option<Weekday>,
        time: NaiveTime,
    },
    Hail,
    WakeUpInterval {
        seconds: u32,
        target_node: u8,
    },
    WakeUpNotification,
    WakeUpCapabilities {
        minimum: u32,
        maximum: u32,
        default: u32,
        step: u32,
    },
    Association {
        group: u8,
        max_nodes: u8,
        nodes: Vec<u8>,
        /// (node, endpoint) pairs, Multi Channel Association only
        endpoints: Vec<(u8, u8)>,
    },
    AssociationGroupings {
        count: u8,
    },
    Version {
        library_type: u8,
        protocol: String,
        application: String,
        hardware: Option<u8>,
        firmware_targets: Vec<String>,
    },
    CommandClassVersion {
        command_class: u8,
        version: u8,
    },
    Indicator {
        value: u8,
        objects: Vec<IndicatorObject>,
    },
    IndicatorSupported {
        indicator: u8,
        next_indicator: u8,
        properties: Vec<u8>,
    },
    Time {
        time: NaiveTime,
        rtc_failure: bool,
    },
    Date {
        date: NaiveDate,
    },
    TimeParameters {
        timestamp: NaiveDateTime,
    },
    SensorAlarm {
        source_node: u8,
        alarm_type: u8,
        level: u8,
        seconds: u16,
    },
    SensorAlarmSupported {
        alarm_types: Vec<u8>,
    },
}
