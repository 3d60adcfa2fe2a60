//! Multi Channel Association command class (0x8E)
//!
//! Same commands as Association, with endpoint destinations appended after
//! a 0x00 marker:
//!
//! ```text
//! [group][node...][0x00][node][endpoint][node][endpoint]...
//! ```

use std::collections::HashMap;

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::association::{check_group, GroupAccumulator};
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const REMOVE: u8 = 0x04;
const GROUPINGS_GET: u8 = 0x05;
const GROUPINGS_REPORT: u8 = 0x06;

const MARKER: u8 = 0x00;

fn destinations(group: u8, nodes: &[u8], endpoints: &[(u8, u8)]) -> Vec<u8> {
    let mut args = vec![group];
    args.extend_from_slice(nodes);
    if !endpoints.is_empty() {
        args.push(MARKER);
        for (node, endpoint) in endpoints {
            args.push(*node);
            args.push(*endpoint);
        }
    }
    args
}

/// Split a member list at the marker
fn split_members(data: &[u8]) -> (Vec<u8>, Vec<(u8, u8)>) {
    let marker = data.iter().position(|byte| *byte == MARKER);
    let (nodes, rest) = match marker {
        Some(index) => (&data[..index], &data[index + 1..]),
        None => (data, &[][..]),
    };
    let endpoints = rest
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();
    (nodes.to_vec(), endpoints)
}

#[derive(Debug)]
pub struct MultiChannelAssociationHandler {
    base: HandlerBase,
    groups: Option<u8>,
    endpoints: HashMap<u8, Vec<(u8, u8)>>,
    pending: GroupAccumulator,
}

impl MultiChannelAssociationHandler {
    pub fn group_count(&self) -> Option<u8> {
        self.groups
    }

    /// Endpoint destinations of `group` from the last complete report
    pub fn endpoints(&self, group: u8) -> Option<&[(u8, u8)]> {
        self.endpoints.get(&group).map(Vec::as_slice)
    }

    pub fn encode_get(&self, group: u8) -> Result<SendData> {
        check_group(group)?;
        Ok(self.base.message(GET, &[group]))
    }

    pub fn encode_set(&self, group: u8, nodes: &[u8], endpoints: &[(u8, u8)]) -> Result<SendData> {
        check_group(group)?;
        Ok(self.base.message(SET, &destinations(group, nodes, endpoints)))
    }

    pub fn encode_remove(&self, group: u8, nodes: &[u8], endpoints: &[(u8, u8)]) -> SendData {
        self.base.message(REMOVE, &destinations(group, nodes, endpoints))
    }

    pub fn encode_groupings_get(&self) -> SendData {
        self.base.message(GROUPINGS_GET, &[])
    }
}

impl HandlerType for MultiChannelAssociationHandler {
    const ID: CommandClassId = CommandClassId::MultiChannelAssociation;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            groups: None,
            endpoints: HashMap::new(),
            pending: GroupAccumulator::default(),
        }
    }
}

impl CommandClassHandler for MultiChannelAssociationHandler {
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
                let (nodes, endpoints) = split_members(cursor.read_remaining());

                if let Some(complete) =
                    self.pending
                        .add(group, max_nodes, to_follow, &nodes, &endpoints)
                {
                    self.endpoints.insert(group, complete.endpoints.clone());
                    out.push(EventKind::Association {
                        group,
                        max_nodes: complete.max_nodes,
                        nodes: complete.nodes,
                        endpoints: complete.endpoints,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_class::testing::{decode, handler, payload};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_set_with_endpoints() {
        let association = handler::<MultiChannelAssociationHandler>(2);
        assert_eq!(
            payload(&association.encode_set(1, &[1], &[(5, 2)]).unwrap()),
            vec![0x8E, 0x01, 0x01, 0x01, 0x00, 0x05, 0x02]
        );
        assert_eq!(
            payload(&association.encode_set(1, &[1], &[]).unwrap()),
            vec![0x8E, 0x01, 0x01, 0x01]
        );
    }

    #[test]
    fn test_report_round_trip() {
        let mut association = handler::<MultiChannelAssociationHandler>(2);
        let request = association.encode_set(2, &[1, 4], &[(5, 1), (5, 2)]).unwrap();

        let mut report = vec![REPORT, 0x02, 0x0A, 0x00];
        report.extend_from_slice(&request.payload[3..]);
        assert_eq!(
            decode(&mut association, &report),
            vec![EventKind::Association {
                group: 2,
                max_nodes: 10,
                nodes: vec![1, 4],
                endpoints: vec![(5, 1), (5, 2)]
            }]
        );
        assert_eq!(association.endpoints(2), Some(&[(5u8, 1u8), (5, 2)][..]));
    }

    #[test]
    fn test_report_spanning_frames() {
        let mut association = handler::<MultiChannelAssociationHandler>(2);
        assert!(decode(&mut association, &[REPORT, 0x01, 0x05, 0x01, 0x01]).is_empty());
        assert_eq!(
            decode(&mut association, &[REPORT, 0x01, 0x05, 0x00, 0x00, 0x07, 0x01]),
            vec![EventKind::Association {
                group: 1,
                max_nodes: 5,
                nodes: vec![1],
                endpoints: vec![(7, 1)]
            }]
        );
    }
}
