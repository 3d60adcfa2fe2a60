//! Version command class (0x86)
//!
//! The command class version report is what the dispatcher uses to switch
//! the field layout of a node's other handlers.

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const GET: u8 = 0x11;
const REPORT: u8 = 0x12;
const COMMAND_CLASS_GET: u8 = 0x13;
const COMMAND_CLASS_REPORT: u8 = 0x14;

fn format_version(major: u8, minor: u8) -> String {
    format!("{}.{:02}", major, minor)
}

#[derive(Debug)]
pub struct VersionHandler {
    base: HandlerBase,
}

impl VersionHandler {
    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    /// Ask which version of `class` the node implements
    pub fn encode_command_class_get(&self, class: u8) -> SendData {
        self.base.message(COMMAND_CLASS_GET, &[class])
    }
}

impl HandlerType for VersionHandler {
    const ID: CommandClassId = CommandClassId::Version;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for VersionHandler {
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
                let library_type = cursor.read_u8()?;
                let protocol = format_version(cursor.read_u8()?, cursor.read_u8()?);
                let application = format_version(cursor.read_u8()?, cursor.read_u8()?);

                let mut hardware = None;
                let mut firmware_targets = Vec::new();
                if self.base.version() >= 2 && !cursor.is_empty() {
                    hardware = Some(cursor.read_u8()?);
                    let targets = cursor.read_u8()?;
                    for _ in 0..targets {
                        firmware_targets.push(format_version(cursor.read_u8()?, cursor.read_u8()?));
                    }
                }

                out.push(EventKind::Version {
                    library_type,
                    protocol,
                    application,
                    hardware,
                    firmware_targets,
                });
            }
            COMMAND_CLASS_REPORT => {
                let command_class = cursor.read_u8()?;
                let version = cursor.read_u8()?;
                out.push(EventKind::CommandClassVersion {
                    command_class,
                    version,
                });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
