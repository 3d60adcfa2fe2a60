//! Node and endpoint directory
//!
//! Tracks which command classes each node endpoint supports, at which
//! version, and owns the live handler instances. Endpoint 0 is the root
//! device and always exists once a node is known.

use std::collections::BTreeMap;

use tracing::debug;
use zwrust_core::NodeInfo;

use crate::command_class::{CommandClassHandler, HandlerContext};
use crate::registry::Registry;

/// One addressable unit of a node
#[derive(Debug, Default)]
pub struct Endpoint {
    id: u8,
    generic_class: Option<u8>,
    specific_class: Option<u8>,
    /// Supported class id to version (1 until reported otherwise)
    classes: BTreeMap<u8, u8>,
    handlers: BTreeMap<u8, Box<dyn CommandClassHandler>>,
}

impl Endpoint {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn generic_class(&self) -> Option<u8> {
        self.generic_class
    }

    pub fn specific_class(&self) -> Option<u8> {
        self.specific_class
    }

    pub fn set_device_class(&mut self, generic_class: u8, specific_class: u8) {
        self.generic_class = Some(generic_class);
        self.specific_class = Some(specific_class);
    }

    /// Mark `class` as supported; a known version is kept
    pub fn add_class(&mut self, class: u8) {
        self.classes.entry(class).or_insert(1);
    }

    pub fn supports_class(&self, class: u8) -> bool {
        self.classes.contains_key(&class)
    }

    pub fn class_version(&self, class: u8) -> Option<u8> {
        self.classes.get(&class).copied()
    }

    /// Supported class ids in ascending order
    pub fn classes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.classes.iter().map(|(class, version)| (*class, *version))
    }

    /// Record the version of `class` and apply it to a live handler
    ///
    /// Version 0 means the endpoint does not support the class.
    pub fn set_class_version(&mut self, class: u8, version: u8) {
        if version == 0 {
            self.classes.remove(&class);
            self.handlers.remove(&class);
            return;
        }

        self.classes.insert(class, version);
        if let Some(handler) = self.handlers.get_mut(&class) {
            handler.set_version(version);
        }
    }

    pub fn handler(&self, class: u8) -> Option<&dyn CommandClassHandler> {
        self.handlers.get(&class).map(|handler| handler.as_ref())
    }

    pub fn handler_mut(&mut self, class: u8) -> Option<&mut dyn CommandClassHandler> {
        match self.handlers.get_mut(&class) {
            Some(handler) => Some(handler.as_mut()),
            None => None,
        }
    }

    /// Live handler for `class`, created from `registry` on first use
    ///
    /// A new handler starts at the version recorded for the class.
    pub fn handler_or_insert(
        &mut self,
        node_id: u8,
        class: u8,
        registry: &Registry,
    ) -> Option<&mut dyn CommandClassHandler> {
        if !self.handlers.contains_key(&class) {
            let mut handler = registry.instantiate(class, HandlerContext::new(node_id, self.id))?;
            if let Some(version) = self.classes.get(&class) {
                handler.set_version(*version);
            }
            debug!(
                node_id,
                endpoint = self.id,
                class = %handler.id(),
                version = handler.version(),
                "Created handler"
            );
            self.handlers.insert(class, handler);
        }
        self.handler_mut(class)
    }
}

/// A node and its endpoints
#[derive(Debug)]
pub struct Node {
    id: u8,
    basic_class: Option<u8>,
    endpoints: BTreeMap<u8, Endpoint>,
}

impl Node {
    pub fn new(id: u8) -> Self {
        let mut endpoints = BTreeMap::new();
        endpoints.insert(0, Endpoint::new(0));
        Self {
            id,
            basic_class: None,
            endpoints,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn basic_class(&self) -> Option<u8> {
        self.basic_class
    }

    pub fn root(&self) -> &Endpoint {
        &self.endpoints[&0]
    }

    pub fn endpoint(&self, endpoint: u8) -> Option<&Endpoint> {
        self.endpoints.get(&endpoint)
    }

    pub fn endpoint_mut(&mut self, endpoint: u8) -> Option<&mut Endpoint> {
        self.endpoints.get_mut(&endpoint)
    }

    /// Endpoint `endpoint`, created if missing
    pub fn add_endpoint(&mut self, endpoint: u8) -> &mut Endpoint {
        self.endpoints
            .entry(endpoint)
            .or_insert_with(|| Endpoint::new(endpoint))
    }

    /// Endpoint ids, root included
    pub fn endpoint_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.endpoints.keys().copied()
    }

    /// Apply a node information frame to the root endpoint
    pub fn update(&mut self, info: &NodeInfo) {
        self.basic_class = Some(info.basic_class);

        let Some(root) = self.endpoints.get_mut(&0) else {
            return;
        };
        root.set_device_class(info.generic_class, info.specific_class);
        for class in &info.supported {
            root.add_class(*class);
        }
    }
}

/// Every node the dispatcher has heard of
#[derive(Debug, Default)]
pub struct NodeDirectory {
    nodes: BTreeMap<u8, Node>,
}

impl NodeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, node_id: u8) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn node_mut(&mut self, node_id: u8) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Node `node_id`, created if missing
    pub fn add_node(&mut self, node_id: u8) -> &mut Node {
        self.nodes.entry(node_id).or_insert_with(|| Node::new(node_id))
    }

    pub fn remove_node(&mut self, node_id: u8) -> Option<Node> {
        self.nodes.remove(&node_id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Record a node information frame
    pub fn update_node_info(&mut self, info: &NodeInfo) {
        debug!(
            node_id = info.node_id,
            generic = info.generic_class,
            specific = info.specific_class,
            classes = info.supported.len(),
            "Node information"
        );
        self.add_node(info.node_id).update(info);
    }

    /// Does `node_id`, endpoint `endpoint` support `class` at `version` or later
    pub fn supports(&self, node_id: u8, endpoint: u8, class: u8, version: u8) -> bool {
        self.nodes
            .get(&node_id)
            .and_then(|node| node.endpoint(endpoint))
            .and_then(|endpoint| endpoint.class_version(class))
            .is_some_and(|supported| supported >= version)
    }

    /// Record the version of `class` on one endpoint of a node
    pub fn set_class_version(&mut self, node_id: u8, endpoint: u8, class: u8, version: u8) {
        self.add_node(node_id)
            .add_endpoint(endpoint)
            .set_class_version(class, version);
    }
}
