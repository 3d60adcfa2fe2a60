//! Inbound frame dispatch
//!
//! The dispatcher turns serial frames into events:
//!
//! 1. ApplicationCommandHandler frames are unpacked into a node id and a
//!    command class payload.
//! 2. The registry resolves the class id to a handler for the node endpoint
//!    (created on first use) and the handler decodes the payload.
//! 3. Encapsulated commands found by the handler are dispatched again for
//!    their endpoint, up to [`MAX_ENCAPSULATION_DEPTH`] levels.
//! 4. Every event is published to the sink and returned.
//!
//! Reports that describe the node itself (command class versions, endpoint
//! capabilities) are also applied to the [`NodeDirectory`] so later decodes
//! use the right layout.
//!
//! Nothing here fails: unknown classes, unknown endpoints and short payloads
//! only ever affect the command they occur in. A command for an endpoint
//! other than the root is only decoded if the endpoint announced the class.

use std::sync::Arc;

use tracing::{debug, trace, warn};
use zwrust_core::{ApplicationCommand, Frame, MessageClass, NodeInfo, PayloadCursor};
use zwrust_types::{Event, EventKind};

use crate::command_class::{CommandClassHandler, HandlerType};
use crate::node::NodeDirectory;
use crate::registry::Registry;
use crate::sink::{EventSink, NullSink};

/// Deepest nesting of encapsulated commands that is followed
pub const MAX_ENCAPSULATION_DEPTH: usize = 4;

/// Routes inbound commands to handlers and publishes the events
pub struct Dispatcher {
    registry: Arc<Registry>,
    nodes: NodeDirectory,
    sink: Arc<dyn EventSink>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            registry,
            nodes: NodeDirectory::new(),
            sink,
        }
    }

    /// Dispatcher over [`Registry::standard`] that publishes nowhere
    pub fn standard() -> Self {
        Self::new(Arc::new(Registry::standard()), Arc::new(NullSink))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn nodes(&self) -> &NodeDirectory {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut NodeDirectory {
        &mut self.nodes
    }

    /// Replace the event sink
    pub fn set_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sink = sink;
    }

    /// Decode one serial frame
    ///
    /// Frames other than application commands and node information
    /// updates produce no events.
    pub fn dispatch(&mut self, frame: &Frame) -> Vec<Event> {
        match frame.message_class {
            MessageClass::ApplicationCommandHandler => match ApplicationCommand::from_frame(frame) {
                Ok(command) => self.dispatch_command(command.node_id, 0, &command.payload),
                Err(err) => {
                    warn!(error = %err, "Malformed application command");
                    Vec::new()
                }
            },
            MessageClass::ApplicationUpdate => {
                match NodeInfo::from_frame(frame) {
                    Ok(Some(info)) => self.nodes.update_node_info(&info),
                    Ok(None) => debug!("Application update without node information"),
                    Err(err) => warn!(error = %err, "Malformed application update"),
                }
                Vec::new()
            }
            other => {
                debug!(class = %other, "No dispatch for message class");
                Vec::new()
            }
        }
    }

    /// Decode a command class payload (`[class][command][args...]`) from
    /// `node_id`, addressed to `endpoint`
    pub fn dispatch_command(&mut self, node_id: u8, endpoint: u8, payload: &[u8]) -> Vec<Event> {
        trace!(node_id, endpoint, payload = %hex::encode(payload), "Dispatching command");

        let mut events = Vec::new();
        self.dispatch_nested(node_id, endpoint, payload, 0, &mut events);

        for event in &events {
            self.sink.publish(event);
        }
        events
    }

    fn dispatch_nested(
        &mut self,
        node_id: u8,
        endpoint: u8,
        payload: &[u8],
        depth: usize,
        events: &mut Vec<Event>,
    ) {
        if depth > MAX_ENCAPSULATION_DEPTH {
            warn!(node_id, endpoint, depth, "Encapsulation too deep, dropping command");
            return;
        }

        let Some((&class, body)) = payload.split_first() else {
            debug!(node_id, endpoint, "Empty command payload");
            return;
        };

        let node = self.nodes.add_node(node_id);
        let Some(target) = node.endpoint_mut(endpoint) else {
            warn!(node_id, endpoint, class, "Unknown endpoint, dropping command");
            return;
        };
        if endpoint != 0 && !target.supports_class(class) {
            warn!(node_id, endpoint, class, "Endpoint does not support class, dropping command");
            return;
        }
        let Some(handler) = target.handler_or_insert(node_id, class, &self.registry) else {
            debug!(node_id, endpoint, class, "Unregistered command class, nothing to decode");
            return;
        };

        let class_id = handler.id();
        let mut cursor = PayloadCursor::new(body);
        let output = handler.decode_payload(&mut cursor);

        for kind in output.events {
            let event = Event::new(node_id, endpoint, class_id, kind);
            self.learn(&event);
            events.push(event);
        }

        for envelope in output.envelopes {
            self.dispatch_nested(node_id, envelope.endpoint, envelope.payload, depth + 1, events);
        }
    }

    /// Apply reports about the node's own capabilities to the directory
    fn learn(&mut self, event: &Event) {
        let node = self.nodes.add_node(event.node_id);

        match &event.kind {
            EventKind::CommandClassVersion {
                command_class,
                version,
            } => {
                debug!(
                    node_id = event.node_id,
                    endpoint = event.endpoint,
                    class = command_class,
                    version,
                    "Command class version"
                );
                node.add_endpoint(event.endpoint)
                    .set_class_version(*command_class, *version);

                // endpoints implement the root's version
                if event.endpoint == 0 {
                    let endpoints: Vec<u8> = node.endpoint_ids().filter(|id| *id != 0).collect();
                    for id in endpoints {
                        if let Some(target) = node.endpoint_mut(id) {
                            if target.supports_class(*command_class) {
                                target.set_class_version(*command_class, *version);
                            }
                        }
                    }
                }
            }
            EventKind::MultiInstanceCount {
                command_class,
                instances,
            } => {
                for instance in 1..=*instances {
                    node.add_endpoint(instance).add_class(*command_class);
                }
            }
            EventKind::MultiChannelEndpoints { count, .. } => {
                for id in 1..=*count {
                    node.add_endpoint(id);
                }
            }
            EventKind::MultiChannelCapability {
                endpoint,
                generic_class,
                specific_class,
                command_classes,
                ..
            } => {
                let target = node.add_endpoint(*endpoint);
                target.set_device_class(*generic_class, *specific_class);
                for class in command_classes {
                    target.add_class(*class);
                }
            }
            _ => {}
        }
    }

    /// Live handler of type `T` on a node endpoint, created if the endpoint
    /// exists and the handler does not yet
    ///
    /// Use this to encode requests with the version negotiated for the node.
    pub fn handler_mut<T: HandlerType>(&mut self, node_id: u8, endpoint: u8) -> Option<&mut T> {
        let handler: &mut dyn CommandClassHandler = self
            .nodes
            .add_node(node_id)
            .endpoint_mut(endpoint)?
            .handler_or_insert(node_id, T::ID.id(), &self.registry)?;
        handler.as_any_mut().downcast_mut::<T>()
    }

    /// Existing handler of type `T`, if it has been created
    pub fn handler<T: HandlerType>(&self, node_id: u8, endpoint: u8) -> Option<&T> {
        let handler = self
            .nodes
            .node(node_id)?
            .endpoint(endpoint)?
            .handler(T::ID.id())?;
        handler.as_any().downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registered", &self.registry.len())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
