//! Association Group Information command class (0x59)
//!
//! A group is described by three separate reports: name, info (profile)
//! and command list. They may arrive in any order and some may never
//! arrive, so each group is a record of optional fields and
//! [`GroupInfo::is_complete`] is derived from what is present.

use std::collections::BTreeMap;

use zwrust_core::{PayloadCursor, SendData, StringEncoding};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const NAME_GET: u8 = 0x01;
const NAME_REPORT: u8 = 0x02;
const INFO_GET: u8 = 0x03;
const INFO_REPORT: u8 = 0x04;
const COMMAND_LIST_GET: u8 = 0x05;
const COMMAND_LIST_REPORT: u8 = 0x06;

/// Bytes per group in an info report
const INFO_RECORD_LEN: usize = 7;

/// First class id of the two-byte extended range
const EXTENDED_CLASS_START: u8 = 0xF1;

/// Lifeline profile (general category, id 1)
pub const PROFILE_LIFELINE: u16 = 0x0001;

/// Everything learned about one association group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupInfo {
    pub name: Option<String>,
    pub profile: Option<u16>,
    pub event_code: Option<u16>,
    pub dynamic: bool,
    /// (class, command) pairs the group sends
    pub commands: Option<Vec<(u8, u8)>>,
}

impl GroupInfo {
    /// Name, profile and command list have all been reported
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.profile.is_some() && self.commands.is_some()
    }
}

#[derive(Debug)]
pub struct AssociationGroupInfoHandler {
    base: HandlerBase,
    groups: BTreeMap<u8, GroupInfo>,
}

impl AssociationGroupInfoHandler {
    /// What is known about `group`
    pub fn group(&self, group: u8) -> Option<&GroupInfo> {
        self.groups.get(&group)
    }

    pub fn groups(&self) -> impl Iterator<Item = (u8, &GroupInfo)> {
        self.groups.iter().map(|(id, info)| (*id, info))
    }

    /// Check if every known group is complete
    pub fn is_complete(&self) -> bool {
        !self.groups.is_empty() && self.groups.values().all(GroupInfo::is_complete)
    }

    pub fn encode_name_get(&self, group: u8) -> Result<SendData> {
        check_group(group)?;
        Ok(self.base.message(NAME_GET, &[group]))
    }

    /// Request info for `group`, or all groups when `group` is `None`
    pub fn encode_info_get(&self, group: Option<u8>, refresh_cache: bool) -> Result<SendData> {
        let mut flags = if refresh_cache { 0x80 } else { 0x00 };
        let group = match group {
            Some(group) => {
                check_group(group)?;
                group
            }
            None => {
                flags |= 0x40;
                0
            }
        };
        Ok(self.base.message(INFO_GET, &[flags, group]))
    }

    pub fn encode_command_list_get(&self, group: u8, allow_cache: bool) -> Result<SendData> {
        check_group(group)?;
        let flags = if allow_cache { 0x80 } else { 0x00 };
        Ok(self.base.message(COMMAND_LIST_GET, &[flags, group]))
    }

    fn entry(&mut self, group: u8) -> &mut GroupInfo {
        self.groups.entry(group).or_default()
    }
}

fn check_group(group: u8) -> Result<()> {
    if group == 0 {
        return Err(Error::InvalidArgument("association group 0".into()));
    }
    Ok(())
}

impl HandlerType for AssociationGroupInfoHandler {
    const ID: CommandClassId = CommandClassId::AssociationGroupInfo;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            groups: BTreeMap::new(),
        }
    }
}

impl CommandClassHandler for AssociationGroupInfoHandler {
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
            NAME_REPORT => {
                let group = cursor.read_u8()?;
                let len = usize::from(cursor.read_u8()?);
                let name = cursor.read_fixed_string(len, StringEncoding::Utf8)?;

                self.entry(group).name = Some(name.clone());
                out.push(EventKind::AssociationGroupName { group, name });
            }
            INFO_REPORT => {
                let properties = cursor.read_u8()?;
                let dynamic = properties & 0x40 != 0;
                let count = usize::from(properties & 0x3F);

                for _ in 0..count {
                    let record = cursor.read_bytes(INFO_RECORD_LEN)?;
                    let group = record[0];
                    let profile = u16::from_be_bytes([record[2], record[3]]);
                    let event_code = u16::from_be_bytes([record[5], record[6]]);

                    let info = self.entry(group);
                    info.profile = Some(profile);
                    info.event_code = Some(event_code);
                    info.dynamic = dynamic;

                    out.push(EventKind::AssociationGroupProfile {
                        group,
                        profile,
                        event_code,
                        dynamic,
                    });
                }
            }
            COMMAND_LIST_REPORT => {
                let group = cursor.read_u8()?;
                let len = usize::from(cursor.read_u8()?);
                let mut list = PayloadCursor::new(cursor.read_bytes(len)?);

                let mut commands = Vec::new();
                while !list.is_empty() {
                    let class = list.read_u8()?;
                    if class >= EXTENDED_CLASS_START {
                        // extended classes are not tracked
                        list.read_u8()?;
                        list.read_u8()?;
                        continue;
                    }
                    commands.push((class, list.read_u8()?));
                }

                self.entry(group).commands = Some(commands.clone());
                out.push(EventKind::AssociationGroupCommands { group, commands });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
