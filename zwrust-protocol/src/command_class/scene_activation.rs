//! Scene Activation command class (0x2B)

use std::time::Duration;

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::{encode_duration, parse_duration, DURATION_DEFAULT};
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;

/// Scene controllers send Set to their associated nodes; the controller
/// sees the same command when it is in the association group.
#[derive(Debug)]
pub struct SceneActivationHandler {
    base: HandlerBase,
}

impl SceneActivationHandler {
    /// Activate `scene_id` (1-255); `None` uses the configured duration
    pub fn encode_set(&self, scene_id: u8, duration: Option<Duration>) -> Result<SendData> {
        if scene_id == 0 {
            return Err(Error::InvalidArgument("scene id 0 is reserved".into()));
        }
        let duration = duration.map(encode_duration).unwrap_or(DURATION_DEFAULT);
        Ok(self.base.message(SET, &[scene_id, duration]))
    }
}

impl HandlerType for SceneActivationHandler {
    const ID: CommandClassId = CommandClassId::SceneActivation;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for SceneActivationHandler {
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
        if command != SET {
            return self.base.ignore(command);
        }

        let scene_id = cursor.read_u8()?;
        // dimming duration is optional in the wild
        let duration = if cursor.is_empty() {
            None
        } else {
            parse_duration(cursor.read_u8()?)
        };
        out.push(EventKind::SceneActivation { scene_id, duration });
        Ok(())
    }
}
