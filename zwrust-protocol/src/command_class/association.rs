//! Association command class (0x85)
//!
//! A group listing may span several reports; `reports to follow` counts
//! down to 0 on the last one. Members are collected per group and a single
//! event is emitted for the complete list.

use std::collections::HashMap;

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const REMOVE: u8 = 0x04;
const GROUPINGS_GET: u8 = 0x05;
const GROUPINGS_REPORT: u8 = 0x06;
const SPECIFIC_GROUP_GET: u8 = 0x0B;

/// Members of one group, possibly still incomplete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GroupMembers {
    pub max_nodes: u8,
    pub nodes: Vec<u8>,
    pub endpoints: Vec<(u8, u8)>,
}

/// Collects multi-report group listings
#[derive(Debug, Default)]
pub(crate) struct GroupAccumulator {
    pending: HashMap<u8, GroupMembers>,
}

impl GroupAccumulator {
    /// Add one report; returns the full listing when `to_follow` is 0
    pub fn add(
        &mut self,
        group: u8,
        max_nodes: u8,
        to_follow: u8,
        nodes: &[u8],
        endpoints: &[(u8, u8)],
    ) -> Option<GroupMembers> {
        let members = self.pending.entry(group).or_default();
        members.max_nodes = max_nodes;
        members.nodes.extend_from_slice(nodes);
        members.endpoints.extend_from_slice(endpoints);

        if to_follow > 0 {
            return None;
        }
        self.pending.remove(&group)
    }
}

pub(crate) fn check_group(group: u8) -> Result<()> {
    if group == 0 {
        return Err(Error::InvalidArgument("association group 0".into()));
    }
    Ok(())
}

#[derive(Debug)]
pub struct AssociationHandler {
    base: HandlerBase,
    groups: Option<u8>,
    members: HashMap<u8, Vec<u8>>,
    pending: GroupAccumulator,
}

impl AssociationHandler {
    /// Number of groups, once reported
    pub fn group_count(&self) -> Option<u8> {
        self.groups
    }

    /// Last complete member list of `group`
    pub fn members(&self, group: u8) -> Option<&[u8]> {
        self.members.get(&group).map(Vec::as_slice)
    }

    pub fn encode_get(&self, group: u8) -> Result<SendData> {
        check_group(group)?;
        Ok(self.base.message(GET, &[group]))
    }

    pub fn encode_set(&self, group: u8, nodes: &[u8]) -> Result<SendData> {
        check_group(group)?;
        let mut args = vec![group];
        args.extend_from_slice(nodes);
        Ok(self.base.message(SET, &args))
    }

    /// Remove `nodes` from `group`; an empty list clears the group
    pub fn encode_remove(&self, group: u8, nodes: &[u8]) -> SendData {
        let mut args = vec![group];
        args.extend_from_slice(nodes);
        self.base.message(REMOVE, &args)
    }

    pub fn encode_groupings_get(&self) -> SendData {
        self.base.message(GROUPINGS_GET, &[])
    }

    pub fn encode_specific_group_get(&self) -> Result<SendData> {
        self.base.require_version(SPECIFIC_GROUP_GET, 2)?;
        Ok(self.base.message(SPECIFIC_GROUP_GET, &[]))
    }
}

impl HandlerType for AssociationHandler {
    const ID: CommandClassId = CommandClassId::Association;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            groups: None,
            members: HashMap::new(),
            pending: GroupAccumulator::default(),
        }
    }
}

impl CommandClassHandler for AssociationHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase {
        &mut self.base
    }

    fn handle<'a>(
        &mut self,
        command: u8,
        cursor: &mut PayloadCursor<'a>,
        out: &mut DecodeOutput<'a>,
    ) -> std::result::Result<(), DecodeError> {
        match command {
            REPORT => {
                let group = cursor.read_u8()?;
                let max_nodes = cursor.read_u8()?;
                let to_follow = cursor.read_u8()?;
                let nodes = cursor.read_remaining();

                if let Some(complete) = self.pending.add(group, max_nodes, to_follow, nodes, &[]) {
                    self.members.insert(group, complete.nodes.clone());
                    out.push(EventKind::Association {
                        group,
                        max_nodes: complete.max_nodes,
                        nodes: complete.nodes,
                        endpoints: Vec::new(),
                    });
                }
            }
            GROUPINGS_REPORT => {
                let count = cursor.read_u8()?;
                self.groups = Some(count);
                out.push(EventKind::AssociationGroupings { count });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
