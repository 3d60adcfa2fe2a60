//! Command class identifiers

use std::fmt;

use crate::error::{Error, Result};

/// Z-Wave command class identifiers
///
/// The numeric value is the byte that leads every command class payload on
/// the wire. Only classes this library knows how to name are listed; raw ids
/// that are not in this table are treated as "nothing to decode" by the
/// dispatcher rather than as errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CommandClassId {
    NoOperation = 0x00,
    Basic = 0x20,
    ControllerReplication = 0x21,
    ApplicationStatus = 0x22,
    SwitchBinary = 0x25,
    SwitchMultilevel = 0x26,
    SwitchAll = 0x27,
    SwitchToggleBinary = 0x28,
    SceneActivation = 0x2B,
    SceneActuatorConf = 0x2C,
    SensorBinary = 0x30,
    SensorMultilevel = 0x31,
    Meter = 0x32,
    Color = 0x33,
    MeterTableMonitor = 0x3D,
    ThermostatMode = 0x40,
    ThermostatOperatingState = 0x42,
    ThermostatSetpoint = 0x43,
    ThermostatFanMode = 0x44,
    ThermostatFanState = 0x45,
    ClimateControlSchedule = 0x46,
    Crc16Encap = 0x56,
    AssociationGroupInfo = 0x59,
    DeviceResetLocally = 0x5A,
    CentralScene = 0x5B,
    ZwavePlusInfo = 0x5E,
    MultiInstance = 0x60,
    DoorLock = 0x62,
    UserCode = 0x63,
    BarrierOperator = 0x66,
    Configuration = 0x70,
    Alarm = 0x71,
    ManufacturerSpecific = 0x72,
    PowerLevel = 0x73,
    Protection = 0x75,
    Lock = 0x76,
    NodeNaming = 0x77,
    FirmwareUpdateMd = 0x7A,
    Battery = 0x80,
    Clock = 0x81,
    Hail = 0x82,
    WakeUp = 0x84,
    Association = 0x85,
    Version = 0x86,
    Indicator = 0x87,
    Time = 0x8A,
    TimeParameters = 0x8B,
    MultiChannelAssociation = 0x8E,
    Security = 0x98,
    SensorAlarm = 0x9C,
}

impl CommandClassId {
    /// Marker separating supported from controlled classes in node info lists
    pub const MARK: u8 = 0xEF;

    /// Look up a class by its wire id
    pub fn from_u8(value: u8) -> Option<Self> {
        let id = match value {
            0x00 => Self::NoOperation,
            0x20 => Self::Basic,
            0x21 => Self::ControllerReplication,
            0x22 => Self::ApplicationStatus,
            0x25 => Self::SwitchBinary,
            0x26 => Self::SwitchMultilevel,
            0x27 => Self::SwitchAll,
            0x28 => Self::SwitchToggleBinary,
            0x2B => Self::SceneActivation,
            0x2C => Self::SceneActuatorConf,
            0x30 => Self::SensorBinary,
            0x31 => Self::SensorMultilevel,
            0x32 => Self::Meter,
            0x33 => Self::Color,
            0x3D => Self::MeterTableMonitor,
            0x40 => Self::ThermostatMode,
            0x42 => Self::ThermostatOperatingState,
            0x43 => Self::ThermostatSetpoint,
            0x44 => Self::ThermostatFanMode,
            0x45 => Self::ThermostatFanState,
            0x46 => Self::ClimateControlSchedule,
            0x56 => Self::Crc16Encap,
            0x59 => Self::AssociationGroupInfo,
            0x5A => Self::DeviceResetLocally,
            0x5B => Self::CentralScene,
            0x5E => Self::ZwavePlusInfo,
            0x60 => Self::MultiInstance,
            0x62 => Self::DoorLock,
            0x63 => Self::UserCode,
            0x66 => Self::BarrierOperator,
            0x70 => Self::Configuration,
            0x71 => Self::Alarm,
            0x72 => Self::ManufacturerSpecific,
            0x73 => Self::PowerLevel,
            0x75 => Self::Protection,
            0x76 => Self::Lock,
            0x77 => Self::NodeNaming,
            0x7A => Self::FirmwareUpdateMd,
            0x80 => Self::Battery,
            0x81 => Self::Clock,
            0x82 => Self::Hail,
            0x84 => Self::WakeUp,
            0x85 => Self::Association,
            0x86 => Self::Version,
            0x87 => Self::Indicator,
            0x8A => Self::Time,
            0x8B => Self::TimeParameters,
            0x8E => Self::MultiChannelAssociation,
            0x98 => Self::Security,
            0x9C => Self::SensorAlarm,
            _ => return None,
        };
        Some(id)
    }

    /// Wire id of this class
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::NoOperation => "NO_OPERATION",
            Self::Basic => "BASIC",
            Self::ControllerReplication => "CONTROLLER_REPLICATION",
            Self::ApplicationStatus => "APPLICATION_STATUS",
            Self::SwitchBinary => "SWITCH_BINARY",
            Self::SwitchMultilevel => "SWITCH_MULTILEVEL",
            Self::SwitchAll => "SWITCH_ALL",
            Self::SwitchToggleBinary => "SWITCH_TOGGLE_BINARY",
            Self::SceneActivation => "SCENE_ACTIVATION",
            Self::SceneActuatorConf => "SCENE_ACTUATOR_CONF",
            Self::SensorBinary => "SENSOR_BINARY",
            Self::SensorMultilevel => "SENSOR_MULTILEVEL",
            Self::Meter => "METER",
            Self::Color => "COLOR",
            Self::MeterTableMonitor => "METER_TBL_MONITOR",
            Self::ThermostatMode => "THERMOSTAT_MODE",
            Self::ThermostatOperatingState => "THERMOSTAT_OPERATING_STATE",
            Self::ThermostatSetpoint => "THERMOSTAT_SETPOINT",
            Self::ThermostatFanMode => "THERMOSTAT_FAN_MODE",
            Self::ThermostatFanState => "THERMOSTAT_FAN_STATE",
            Self::ClimateControlSchedule => "CLIMATE_CONTROL_SCHEDULE",
            Self::Crc16Encap => "CRC_16_ENCAP",
            Self::AssociationGroupInfo => "ASSOCIATION_GROUP_INFO",
            Self::DeviceResetLocally => "DEVICE_RESET_LOCALLY",
            Self::CentralScene => "CENTRAL_SCENE",
            Self::ZwavePlusInfo => "ZWAVE_PLUS_INFO",
            Self::MultiInstance => "MULTI_INSTANCE",
            Self::DoorLock => "DOOR_LOCK",
            Self::UserCode => "USER_CODE",
            Self::BarrierOperator => "BARRIER_OPERATOR",
            Self::Configuration => "CONFIGURATION",
            Self::Alarm => "ALARM",
            Self::ManufacturerSpecific => "MANUFACTURER_SPECIFIC",
            Self::PowerLevel => "POWERLEVEL",
            Self::Protection => "PROTECTION",
            Self::Lock => "LOCK",
            Self::NodeNaming => "NODE_NAMING",
            Self::FirmwareUpdateMd => "FIRMWARE_UPDATE_MD",
            Self::Battery => "BATTERY",
            Self::Clock => "CLOCK",
            Self::Hail => "HAIL",
            Self::WakeUp => "WAKE_UP",
            Self::Association => "ASSOCIATION",
            Self::Version => "VERSION",
            Self::Indicator => "INDICATOR",
            Self::Time => "TIME",
            Self::TimeParameters => "TIME_PARAMETERS",
            Self::MultiChannelAssociation => "MULTI_INSTANCE_ASSOCIATION",
            Self::Security => "SECURITY",
            Self::SensorAlarm => "SENSOR_ALARM",
        }
    }
}

impl From<CommandClassId> for u8 {
    fn from(id: CommandClassId) -> u8 {
        id as u8
    }
}

impl TryFrom<u8> for CommandClassId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::UnknownCommandClass(value))
    }
}

impl fmt::Display for CommandClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.label(), *self as u8)
    }
}
