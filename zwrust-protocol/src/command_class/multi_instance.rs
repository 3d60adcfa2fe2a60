//! Multi Instance / Multi Channel command class (0x60)
//!
//! Version 1 addresses "instances" of a single class:
//!
//! ```text
//! [0x60][0x06][instance][class][command][args...]
//! ```
//!
//! Version 2 and later address endpoints and carry a source and a
//! destination:
//!
//! ```text
//! [0x60][0x0D][source][destination][class][command][args...]
//! ```
//!
//! Decoding does not interpret the nested command. It is handed back as an
//! [`Envelope`](super::Envelope) so the dispatcher can route it to the
//! endpoint's own handler.

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const INSTANCE_GET: u8 = 0x04;
const INSTANCE_REPORT: u8 = 0x05;
const INSTANCE_ENCAP: u8 = 0x06;
const ENDPOINT_GET: u8 = 0x07;
const ENDPOINT_REPORT: u8 = 0x08;
const CAPABILITY_GET: u8 = 0x09;
const CAPABILITY_REPORT: u8 = 0x0A;
const ENDPOINT_FIND: u8 = 0x0B;
const ENDPOINT_FIND_REPORT: u8 = 0x0C;
const CHANNEL_ENCAP: u8 = 0x0D;

const ENDPOINT_MASK: u8 = 0x7F;
const DYNAMIC: u8 = 0x80;
const IDENTICAL: u8 = 0x40;

/// Wildcard for endpoint find
pub const ANY_CLASS: u8 = 0xFF;

#[derive(Debug)]
pub struct MultiInstanceHandler {
    base: HandlerBase,
}

impl MultiInstanceHandler {
    /// Ask how many instances of `class` the node has (version 1)
    pub fn encode_instance_get(&self, class: CommandClassId) -> SendData {
        self.base.message(INSTANCE_GET, &[class.id()])
    }

    pub fn encode_endpoint_get(&self) -> Result<SendData> {
        self.base.require_version(ENDPOINT_GET, 2)?;
        Ok(self.base.message(ENDPOINT_GET, &[]))
    }

    pub fn encode_capability_get(&self, endpoint: u8) -> Result<SendData> {
        self.base.require_version(CAPABILITY_GET, 2)?;
        check_endpoint(endpoint)?;
        Ok(self.base.message(CAPABILITY_GET, &[endpoint]))
    }

    /// Find endpoints of a device class; [`ANY_CLASS`] matches everything
    pub fn encode_endpoint_find(&self, generic_class: u8, specific_class: u8) -> Result<SendData> {
        self.base.require_version(ENDPOINT_FIND, 2)?;
        Ok(self
            .base
            .message(ENDPOINT_FIND, &[generic_class, specific_class]))
    }

    /// Wrap `nested` (`[class][command][args...]`) for `endpoint`
    ///
    /// Version 1 uses instance encapsulation, later versions multi channel
    /// encapsulation from the root endpoint.
    pub fn encapsulate(&self, endpoint: u8, nested: &[u8]) -> Result<SendData> {
        check_endpoint(endpoint)?;

        let mut args = Vec::with_capacity(nested.len() + 2);
        let command = if self.base.version() >= 2 {
            args.push(0x00);
            args.push(endpoint);
            CHANNEL_ENCAP
        } else {
            args.push(endpoint);
            INSTANCE_ENCAP
        };
        args.extend_from_slice(nested);

        Ok(self.base.message(command, &args))
    }
}

fn check_endpoint(endpoint: u8) -> Result<()> {
    if endpoint == 0 || endpoint > ENDPOINT_MASK {
        return Err(Error::InvalidArgument(format!("endpoint {}", endpoint)));
    }
    Ok(())
}

/// Class list up to the supported/controlled mark
fn read_class_list(cursor: &mut PayloadCursor<'_>) -> Vec<u8> {
    cursor
        .read_remaining()
        .iter()
        .copied()
        .take_while(|class| *class != CommandClassId::MARK)
        .collect()
}

impl HandlerType for MultiInstanceHandler {
    const ID: CommandClassId = CommandClassId::MultiInstance;
    const MAX_VERSION: u8 = 4;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for MultiInstanceHandler {
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
            INSTANCE_REPORT => {
                let command_class = cursor.read_u8()?;
                let instances = cursor.read_u8()? & ENDPOINT_MASK;
                out.push(EventKind::MultiInstanceCount {
                    command_class,
                    instances,
                });
            }
            INSTANCE_ENCAP => {
                let instance = cursor.read_u8()?;
                let nested = cursor.read_remaining();
                if instance == 0 || nested.is_empty() {
                    return Err(DecodeError::InvalidField {
                        field: "instance",
                        value: u32::from(instance),
                    });
                }
                out.forward(instance, nested);
            }
            ENDPOINT_REPORT => {
                let properties = cursor.read_u8()?;
                let count = cursor.read_u8()? & ENDPOINT_MASK;
                out.push(EventKind::MultiChannelEndpoints {
                    dynamic: properties & DYNAMIC != 0,
                    identical: properties & IDENTICAL != 0,
                    count,
                });
            }
            CAPABILITY_REPORT => {
                let properties = cursor.read_u8()?;
                let generic_class = cursor.read_u8()?;
                let specific_class = cursor.read_u8()?;
                out.push(EventKind::MultiChannelCapability {
                    endpoint: properties & ENDPOINT_MASK,
                    dynamic: properties & DYNAMIC != 0,
                    generic_class,
                    specific_class,
                    command_classes: read_class_list(cursor),
                });
            }
            ENDPOINT_FIND_REPORT => {
                let _reports_to_follow = cursor.read_u8()?;
                let generic_class = cursor.read_u8()?;
                let specific_class = cursor.read_u8()?;
                let endpoints = cursor
                    .read_remaining()
                    .iter()
                    .map(|endpoint| endpoint & ENDPOINT_MASK)
                    .filter(|endpoint| *endpoint != 0)
                    .collect();
                out.push(EventKind::MultiChannelEndpointsFound {
                    generic_class,
                    specific_class,
                    endpoints,
                });
            }
            CHANNEL_ENCAP => {
                let source = cursor.read_u8()? & ENDPOINT_MASK;
                let _destination = cursor.read_u8()?;
                let nested = cursor.read_remaining();
                if nested.is_empty() {
                    return Err(DecodeError::InvalidField {
                        field: "nested command",
                        value: 0,
                    });
                }
                out.forward(source, nested);
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
