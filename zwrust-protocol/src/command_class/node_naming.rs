//! Node Naming and Location command class (0x77)
//!
//! Names and locations are at most 16 bytes. The first byte after the
//! command id selects the character set.

use zwrust_core::{PayloadCursor, SendData, StringEncoding};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::DecodeError;

const NAME_SET: u8 = 0x01;
const NAME_GET: u8 = 0x02;
const NAME_REPORT: u8 = 0x03;
const LOCATION_SET: u8 = 0x04;
const LOCATION_GET: u8 = 0x05;
const LOCATION_REPORT: u8 = 0x06;

const MAX_TEXT_LEN: usize = 16;

/// Character presentation bytes
const ASCII: u8 = 0x00;
const UTF16: u8 = 0x02;

#[derive(Debug)]
pub struct NodeNamingHandler {
    base: HandlerBase,
}

impl NodeNamingHandler {
    pub fn encode_name_get(&self) -> SendData {
        self.base.message(NAME_GET, &[])
    }

    pub fn encode_name_set(&self, name: &str) -> SendData {
        self.base.message(NAME_SET, &encode_text(name))
    }

    pub fn encode_location_get(&self) -> SendData {
        self.base.message(LOCATION_GET, &[])
    }

    pub fn encode_location_set(&self, location: &str) -> SendData {
        self.base.message(LOCATION_SET, &encode_text(location))
    }
}

/// Encode as ASCII when possible, otherwise UTF-16, truncated to 16 bytes
fn encode_text(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        let mut args = vec![ASCII];
        args.extend(text.bytes().take(MAX_TEXT_LEN));
        return args;
    }

    let mut args = vec![UTF16];
    let mut units = [0u16; 2];
    for ch in text.chars() {
        let encoded = ch.encode_utf16(&mut units);
        // never split a surrogate pair
        if args.len() - 1 + encoded.len() * 2 > MAX_TEXT_LEN {
            break;
        }
        args.extend(encoded.iter().flat_map(|unit| unit.to_be_bytes()));
    }
    args
}

fn read_text(cursor: &mut PayloadCursor<'_>) -> std::result::Result<String, DecodeError> {
    let encoding = StringEncoding::from_char_presentation(cursor.read_u8()?);
    let len = cursor.remaining().min(MAX_TEXT_LEN);
    Ok(cursor.read_fixed_string(len, encoding)?)
}

impl HandlerType for NodeNamingHandler {
    const ID: CommandClassId = CommandClassId::NodeNaming;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for NodeNamingHandler {
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
                let name = read_text(cursor)?;
                out.push(EventKind::NodeName { name });
            }
            LOCATION_REPORT => {
                let location = read_text(cursor)?;
                out.push(EventKind::NodeLocation { location });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
