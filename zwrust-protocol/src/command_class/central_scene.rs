//! Central Scene command class (0x5B)

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const SUPPORTED_GET: u8 = 0x01;
const SUPPORTED_REPORT: u8 = 0x02;
const NOTIFICATION: u8 = 0x03;
const CONFIGURATION_SET: u8 = 0x04;
const CONFIGURATION_GET: u8 = 0x05;
const CONFIGURATION_REPORT: u8 = 0x06;

const SLOW_REFRESH: u8 = 0x80;
const KEY_ATTRIBUTE_MASK: u8 = 0x07;

/// Key attributes carried by a notification
pub mod key {
    pub const PRESSED: u8 = 0x00;
    pub const RELEASED: u8 = 0x01;
    pub const HELD_DOWN: u8 = 0x02;
    pub const PRESSED_2X: u8 = 0x03;
    pub const PRESSED_3X: u8 = 0x04;
    pub const PRESSED_4X: u8 = 0x05;
    pub const PRESSED_5X: u8 = 0x06;
}

#[derive(Debug)]
pub struct CentralSceneHandler {
    base: HandlerBase,
    /// Sequence number of the last notification
    last_sequence: Option<u8>,
}

impl CentralSceneHandler {
    pub fn encode_supported_get(&self) -> SendData {
        self.base.message(SUPPORTED_GET, &[])
    }

    pub fn encode_configuration_set(&self, slow_refresh: bool) -> Result<SendData> {
        self.base.require_version(CONFIGURATION_SET, 3)?;
        let flags = if slow_refresh { SLOW_REFRESH } else { 0x00 };
        Ok(self.base.message(CONFIGURATION_SET, &[flags]))
    }

    pub fn encode_configuration_get(&self) -> Result<SendData> {
        self.base.require_version(CONFIGURATION_GET, 3)?;
        Ok(self.base.message(CONFIGURATION_GET, &[]))
    }
}

impl HandlerType for CentralSceneHandler {
    const ID: CommandClassId = CommandClassId::CentralScene;
    const MAX_VERSION: u8 = 3;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            last_sequence: None,
        }
    }
}

impl CommandClassHandler for CentralSceneHandler {
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
            SUPPORTED_REPORT => {
                let scenes = cursor.read_u8()?;
                out.push(EventKind::CentralSceneSupported { scenes });
            }
            NOTIFICATION => {
                let sequence = cursor.read_u8()?;
                let properties = cursor.read_u8()?;
                let scene = cursor.read_u8()?;

                // retransmissions repeat the sequence number
                if self.last_sequence == Some(sequence) {
                    return self.base.ignore(command);
                }
                self.last_sequence = Some(sequence);

                out.push(EventKind::CentralScene {
                    scene,
                    key_attribute: properties & KEY_ATTRIBUTE_MASK,
                    sequence,
                });
            }
            CONFIGURATION_REPORT => {
                let slow_refresh = cursor.read_u8()? & SLOW_REFRESH != 0;
                out.push(EventKind::CentralSceneConfiguration { slow_refresh });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
