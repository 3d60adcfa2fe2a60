//! Command class registry
//!
//! Maps a command class id to a constructor for its handler. The table is
//! built once (usually with [`Registry::standard`]) and shared read-only;
//! handler instances are created per (node, endpoint, class) by the
//! dispatcher.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use tracing::debug;
use zwrust_types::CommandClassId;

use crate::command_class::*;

/// Builds a handler bound to a node endpoint
pub type HandlerFactory = fn(HandlerContext) -> Box<dyn CommandClassHandler>;

fn construct<T: HandlerType>(context: HandlerContext) -> Box<dyn CommandClassHandler> {
    Box::new(T::new(context))
}

/// One registry entry
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: CommandClassId,
    /// Versions the handler implements
    pub versions: RangeInclusive<u8>,
    pub factory: HandlerFactory,
}

/// Command class id to handler constructor table
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<u8, Registration>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every handler this crate implements
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register_handler::<NoOperationHandler>();
        registry.register_handler::<BasicHandler>();
        registry.register_handler::<ApplicationStatusHandler>();
        registry.register_handler::<SwitchBinaryHandler>();
        registry.register_handler::<SwitchMultilevelHandler>();
        registry.register_handler::<SwitchAllHandler>();
        registry.register_handler::<SceneActivationHandler>();
        registry.register_handler::<SensorBinaryHandler>();
        registry.register_handler::<SensorMultilevelHandler>();
        registry.register_handler::<MeterHandler>();
        registry.register_handler::<ColorHandler>();
        registry.register_handler::<MeterTableMonitorHandler>();
        registry.register_handler::<ThermostatModeHandler>();
        registry.register_handler::<ThermostatOperatingStateHandler>();
        registry.register_handler::<ThermostatSetpointHandler>();
        registry.register_handler::<ThermostatFanModeHandler>();
        registry.register_handler::<ThermostatFanStateHandler>();
        registry.register_handler::<Crc16Handler>();
        registry.register_handler::<AssociationGroupInfoHandler>();
        registry.register_handler::<DeviceResetLocallyHandler>();
        registry.register_handler::<CentralSceneHandler>();
        registry.register_handler::<ZwavePlusInfoHandler>();
        registry.register_handler::<MultiInstanceHandler>();
        registry.register_handler::<DoorLockHandler>();
        registry.register_handler::<UserCodeHandler>();
        registry.register_handler::<BarrierOperatorHandler>();
        registry.register_handler::<ConfigurationHandler>();
        registry.register_handler::<AlarmHandler>();
        registry.register_handler::<ManufacturerSpecificHandler>();
        registry.register_handler::<PowerLevelHandler>();
        registry.register_handler::<ProtectionHandler>();
        registry.register_handler::<LockHandler>();
        registry.register_handler::<NodeNamingHandler>();
        registry.register_handler::<BatteryHandler>();
        registry.register_handler::<ClockHandler>();
        registry.register_handler::<HailHandler>();
        registry.register_handler::<WakeUpHandler>();
        registry.register_handler::<AssociationHandler>();
        registry.register_handler::<VersionHandler>();
        registry.register_handler::<IndicatorHandler>();
        registry.register_handler::<TimeHandler>();
        registry.register_handler::<TimeParametersHandler>();
        registry.register_handler::<MultiChannelAssociationHandler>();
        registry.register_handler::<SensorAlarmHandler>();

        registry
    }

    /// Associate `id` with `factory`, replacing any earlier entry
    pub fn register(&mut self, id: CommandClassId, versions: RangeInclusive<u8>, factory: HandlerFactory) {
        debug!(class = %id, ?versions, "Registering command class");
        self.entries.insert(
            id.id(),
            Registration {
                id,
                versions,
                factory,
            },
        );
    }

    /// Register a handler type with all the versions it implements
    pub fn register_handler<T: HandlerType>(&mut self) {
        self.register(T::ID, 1..=T::MAX_VERSION, construct::<T>);
    }

    /// Build a handler for raw class id `class_id`
    ///
    /// Unknown ids yield `None`; that is "nothing to decode", not an error.
    pub fn instantiate(&self, class_id: u8, context: HandlerContext) -> Option<Box<dyn CommandClassHandler>> {
        self.entries
            .get(&class_id)
            .map(|registration| (registration.factory)(context))
    }

    pub fn get(&self, class_id: u8) -> Option<&Registration> {
        self.entries.get(&class_id)
    }

    pub fn supported_versions(&self, class_id: u8) -> Option<RangeInclusive<u8>> {
        self.entries
            .get(&class_id)
            .map(|registration| registration.versions.clone())
    }

    pub fn is_registered(&self, class_id: u8) -> bool {
        self.entries.contains_key(&class_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered class ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = CommandClassId> + '_ {
        self.entries.values().map(|registration| registration.id)
    }
}
