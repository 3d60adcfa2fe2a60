//! Multilevel Switch command class (0x26)
//!
//! Dimmers, blinds and anything else with a 0-99 level. Field availability
//! per version is kept in [`LAYOUTS`].

use std::time::Duration;

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, EventKind};

use super::value::{encode_duration, parse_duration};
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const START_LEVEL_CHANGE: u8 = 0x04;
const STOP_LEVEL_CHANGE: u8 = 0x05;
const SUPPORTED_GET: u8 = 0x06;
const SUPPORTED_REPORT: u8 = 0x07;

/// Fields present at one version
#[derive(Debug, Clone, Copy)]
struct Layout {
    /// Set and Start Level Change carry a duration
    set_duration: bool,
    /// Start Level Change carries a step size
    step_size: bool,
    /// Report carries target value and duration
    report_target: bool,
}

/// Indexed by version - 1
const LAYOUTS: [Layout; 4] = [
    Layout {
        set_duration: false,
        step_size: false,
        report_target: false,
    },
    Layout {
        set_duration: true,
        step_size: false,
        report_target: false,
    },
    Layout {
        set_duration: true,
        step_size: true,
        report_target: false,
    },
    Layout {
        set_duration: true,
        step_size: true,
        report_target: true,
    },
];

/// Direction of a level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDirection {
    Up,
    Down,
}

#[derive(Debug)]
pub struct SwitchMultilevelHandler {
    base: HandlerBase,
}

impl SwitchMultilevelHandler {
    /// Highest dimming level; 0xFF restores the previous level
    pub const MAX_LEVEL: u8 = 99;

    fn layout(&self) -> Layout {
        LAYOUTS[usize::from(self.base.version() - 1)]
    }

    pub fn encode_get(&self) -> SendData {
        self.base.message(GET, &[])
    }

    pub fn encode_set(&self, level: u8, duration: Option<Duration>) -> SendData {
        let level = if level == 0xFF { level } else { level.min(Self::MAX_LEVEL) };
        match duration {
            Some(duration) if self.layout().set_duration => {
                self.base.message(SET, &[level, encode_duration(duration)])
            }
            _ => self.base.message(SET, &[level]),
        }
    }

    /// Start dimming in `direction`, optionally from `start_level`
    pub fn encode_start_level_change(
        &self,
        direction: LevelDirection,
        start_level: Option<u8>,
        duration: Duration,
    ) -> SendData {
        let mut flags = 0u8;
        if direction == LevelDirection::Down {
            flags |= 0x40;
        }
        if start_level.is_none() {
            // ignore start level
            flags |= 0x20;
        }

        let layout = self.layout();
        let mut args = vec![flags, start_level.unwrap_or(0)];
        if layout.set_duration {
            args.push(encode_duration(duration));
        }
        if layout.step_size {
            args.push(0xFF);
        }
        self.base.message(START_LEVEL_CHANGE, &args)
    }

    pub fn encode_stop_level_change(&self) -> SendData {
        self.base.message(STOP_LEVEL_CHANGE, &[])
    }

    /// Ask for the supported switch types (version 3)
    pub fn encode_supported_get(&self) -> Result<SendData> {
        self.base.require_version(SUPPORTED_GET, 3)?;
        Ok(self.base.message(SUPPORTED_GET, &[]))
    }
}

impl HandlerType for SwitchMultilevelHandler {
    const ID: CommandClassId = CommandClassId::SwitchMultilevel;
    const MAX_VERSION: u8 = LAYOUTS.len() as u8;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for SwitchMultilevelHandler {
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
                let value = cursor.read_u8()?;
                let (target, duration) = if self.layout().report_target && cursor.remaining() >= 2 {
                    (Some(cursor.read_u8()?), parse_duration(cursor.read_u8()?))
                } else {
                    (None, None)
                };
                out.push(EventKind::SwitchMultilevel {
                    value,
                    target,
                    duration,
                });
            }
            SUPPORTED_REPORT => {
                let primary = cursor.read_u8()? & 0x1F;
                let secondary = cursor.read_u8()? & 0x1F;
                out.push(EventKind::SwitchMultilevelSupported { primary, secondary });
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
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_set_clamps_level() {
        let dimmer = handler::<SwitchMultilevelHandler>(1);
        assert_eq!(payload(&dimmer.encode_set(150, None)), vec![0x26, 0x01, 99]);
        assert_eq!(payload(&dimmer.encode_set(0xFF, None)), vec![0x26, 0x01, 0xFF]);
    }

    #[test]
    fn test_encode_set_duration_from_v2() {
        let dimmer = handler::<SwitchMultilevelHandler>(1);
        let duration = Some(Duration::from_secs(3));
        assert_eq!(payload(&dimmer.encode_set(50, duration)), vec![0x26, 0x01, 50]);

        let dimmer = handler::<SwitchMultilevelHandler>(2);
        assert_eq!(payload(&dimmer.encode_set(50, duration)), vec![0x26, 0x01, 50, 3]);
    }

    #[test]
    fn test_encode_start_level_change() {
        let dimmer = handler::<SwitchMultilevelHandler>(1);
        assert_eq!(
            payload(&dimmer.encode_start_level_change(LevelDirection::Down, None, Duration::ZERO)),
            vec![0x26, 0x04, 0x60, 0x00]
        );

        let dimmer = handler::<SwitchMultilevelHandler>(3);
        assert_eq!(
            payload(&dimmer.encode_start_level_change(
                LevelDirection::Up,
                Some(10),
                Duration::from_secs(4)
            )),
            vec![0x26, 0x04, 0x00, 10, 4, 0xFF]
        );
    }

    #[test]
    fn test_supported_get_requires_v3() {
        let dimmer = handler::<SwitchMultilevelHandler>(2);
        assert!(matches!(
            dimmer.encode_supported_get(),
            Err(Error::UnsupportedCommand { required: 3, .. })
        ));

        let dimmer = handler::<SwitchMultilevelHandler>(3);
        assert_eq!(payload(&dimmer.encode_supported_get().unwrap()), vec![0x26, 0x06]);
    }

    #[test]
    fn test_decode_report_per_version() {
        let report = [REPORT, 0x32, 0x63, 0x02];

        let mut dimmer = handler::<SwitchMultilevelHandler>(3);
        assert_eq!(
            decode(&mut dimmer, &report),
            vec![EventKind::SwitchMultilevel {
                value: 0x32,
                target: None,
                duration: None
            }]
        );

        let mut dimmer = handler::<SwitchMultilevelHandler>(4);
        assert_eq!(
            decode(&mut dimmer, &report),
            vec![EventKind::SwitchMultilevel {
                value: 0x32,
                target: Some(0x63),
                duration: Some(Duration::from_secs(2))
            }]
        );
    }

    #[test]
    fn test_decode_supported_report() {
        let mut dimmer = handler::<SwitchMultilevelHandler>(3);
        assert_eq!(
            decode(&mut dimmer, &[SUPPORTED_REPORT, 0x02, 0x03]),
            vec![EventKind::SwitchMultilevelSupported {
                primary: 2,
                secondary: 3
            }]
        );
    }
}
