//! Meter command class (0x32)
//!
//! Report layout:
//!
//! ```text
//! [scale2:1|rate:2|type:5][precision:3|scale:2|size:3][value][delta:16][previous]
//! ```
//!
//! The rate type, delta time and previous value arrive with version 2, the
//! third scale bit with version 3. Everything version dependent is kept in
//! [`LAYOUTS`].

use zwrust_core::{PayloadCursor, SendData};
use zwrust_types::{CommandClassId, Decimal, EventKind, MeterReading, MeterScale, MeterType, RateType};

use super::value::bitmask_to_list;
use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Result};

const GET: u8 = 0x01;
const REPORT: u8 = 0x02;
const SUPPORTED_GET: u8 = 0x03;
const SUPPORTED_REPORT: u8 = 0x04;
const RESET: u8 = 0x05;

#[derive(Debug, Clone, Copy)]
struct Layout {
    /// Rate type bits are meaningful
    rate_type: bool,
    /// Delta time and previous value follow the value
    delta: bool,
    /// Bit 7 of the first byte is scale bit 2
    scale_bit2: bool,
    /// Get may name a scale
    scale_get: bool,
    /// Valid bits of the supported scales byte
    supported_scales: u8,
}

/// Indexed by version - 1
const LAYOUTS: [Layout; 3] = [
    Layout {
        rate_type: false,
        delta: false,
        scale_bit2: false,
        scale_get: false,
        supported_scales: 0x0F,
    },
    Layout {
        rate_type: true,
        delta: true,
        scale_bit2: false,
        scale_get: true,
        supported_scales: 0x0F,
    },
    Layout {
        rate_type: true,
        delta: true,
        scale_bit2: true,
        scale_get: true,
        supported_scales: 0x7F,
    },
];

#[derive(Debug)]
pub struct MeterHandler {
    base: HandlerBase,
    /// Learned from the supported report; used to label scales in Get
    meter_type: Option<MeterType>,
}

impl MeterHandler {
    fn layout(&self) -> Layout {
        LAYOUTS[usize::from(self.base.version() - 1)]
    }

    /// Meter type announced by the device, if a supported report arrived
    pub fn meter_type(&self) -> Option<MeterType> {
        self.meter_type
    }

    /// Request a reading, in `scale` when the version allows choosing
    pub fn encode_get(&self, scale: Option<MeterScale>) -> SendData {
        match scale {
            Some(scale) if self.layout().scale_get => {
                self.base.message(GET, &[(scale.scale() & 0x07) << 3])
            }
            _ => self.base.message(GET, &[]),
        }
    }

    pub fn encode_supported_get(&self) -> Result<SendData> {
        self.base.require_version(SUPPORTED_GET, 2)?;
        Ok(self.base.message(SUPPORTED_GET, &[]))
    }

    /// Reset accumulated values
    pub fn encode_reset(&self) -> Result<SendData> {
        self.base.require_version(RESET, 2)?;
        Ok(self.base.message(RESET, &[]))
    }

    fn decode_report(&self, cursor: &mut PayloadCursor<'_>) -> std::result::Result<MeterReading, DecodeError> {
        let layout = self.layout();

        let type_byte = cursor.read_u8()?;
        let meter_type = MeterType::from_u8(type_byte & 0x1F);
        let rate_type = if layout.rate_type {
            RateType::from_u8((type_byte >> 5) & 0x03)
        } else {
            RateType::Unspecified
        };

        let properties = cursor.read_u8()?;
        let precision = properties >> 5;
        let size = usize::from(properties & 0x07);
        if !matches!(size, 1 | 2 | 4) {
            return Err(DecodeError::InvalidField {
                field: "meter value size",
                value: size as u32,
            });
        }

        let mut scale = (properties >> 3) & 0x03;
        if layout.scale_bit2 && type_byte & 0x80 != 0 {
            scale |= 0x04;
        }

        let value = Decimal::new(i64::from(cursor.read_sized(size)?), precision);

        // delta and previous value are optional even at version 2
        let mut delta_time = None;
        let mut previous_value = None;
        if layout.delta && cursor.remaining() >= 2 {
            let delta = cursor.read_u16()?;
            delta_time = Some(delta);
            if delta > 0 && cursor.remaining() >= size {
                previous_value = Some(Decimal::new(i64::from(cursor.read_sized(size)?), precision));
            }
        }

        Ok(MeterReading {
            meter_type,
            rate_type,
            scale: MeterScale::from_parts(meter_type, scale),
            value,
            delta_time,
            previous_value,
        })
    }
}

impl HandlerType for MeterHandler {
    const ID: CommandClassId = CommandClassId::Meter;
    const MAX_VERSION: u8 = LAYOUTS.len() as u8;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            meter_type: None,
        }
    }
}

impl CommandClassHandler for MeterHandler {
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
                let reading = self.decode_report(cursor)?;
                out.push(EventKind::Meter(reading));
            }
            SUPPORTED_REPORT => {
                let type_byte = cursor.read_u8()?;
                let can_reset = type_byte & 0x80 != 0;
                let meter_type = MeterType::from_u8(type_byte & 0x1F);
                let mask = cursor.read_u8()? & self.layout().supported_scales;

                let scales = bitmask_to_list(&[mask], 0)
                    .into_iter()
                    .map(|scale| MeterScale::from_parts(meter_type, scale))
                    .collect();

                self.meter_type = Some(meter_type);
                out.push(EventKind::MeterSupported {
                    meter_type,
                    can_reset,
                    scales,
                });
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

    const ELECTRIC_W: [u8; 7] = [REPORT, 0x21, 0x34, 0x00, 0x00, 0x01, 0xB7];

    fn reading(events: &[EventKind]) -> &MeterReading {
        match events {
            [EventKind::Meter(reading)] => reading,
            other => panic!("expected one meter event, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_electric_watts() {
        let mut meter = handler::<MeterHandler>(2);
        let events = decode(&mut meter, &ELECTRIC_W);
        let reading = reading(&events);

        assert_eq!(reading.meter_type, MeterType::Electric);
        assert_eq!(reading.rate_type, RateType::Import);
        assert_eq!(reading.scale, MeterScale::ElectricW);
        assert_eq!(reading.value, Decimal::new(439, 1));
        assert_eq!(reading.value.to_string(), "43.9");
        assert_eq!(reading.delta_time, None);
    }

    #[test]
    fn test_decode_v1_ignores_rate_type() {
        let mut meter = handler::<MeterHandler>(1);
        let events = decode(&mut meter, &ELECTRIC_W);
        let reading = reading(&events);

        assert_eq!(reading.rate_type, RateType::Unspecified);
        assert_eq!(reading.value.to_string(), "43.9");
    }

    #[test]
    fn test_decode_previous_value() {
        let mut meter = handler::<MeterHandler>(2);
        // kWh, precision 2, size 2: 12.34, delta 60s, previous 12.00
        let events = decode(
            &mut meter,
            &[REPORT, 0x21, 0x42, 0x04, 0xD2, 0x00, 0x3C, 0x04, 0xB0],
        );
        let reading = reading(&events);

        assert_eq!(reading.scale, MeterScale::ElectricKwh);
        assert_eq!(reading.value, Decimal::new(1234, 2));
        assert_eq!(reading.delta_time, Some(60));
        assert_eq!(reading.previous_value, Some(Decimal::new(1200, 2)));
    }

    #[test]
    fn test_decode_scale_bit2_from_v3() {
        // scale bits 00 plus bit 7 of the type byte -> scale 4 (V)
        let report = [REPORT, 0xA1, 0x21, 0x0A];

        let mut meter = handler::<MeterHandler>(2);
        assert_eq!(reading(&decode(&mut meter, &report)).scale, MeterScale::ElectricKwh);

        let mut meter = handler::<MeterHandler>(3);
        let events = decode(&mut meter, &report);
        assert_eq!(reading(&events).scale, MeterScale::ElectricV);
        assert_eq!(reading(&events).value, Decimal::new(10, 1));
    }

    #[test]
    fn test_decode_supported_report() {
        let mut meter = handler::<MeterHandler>(2);
        assert_eq!(
            decode(&mut meter, &[SUPPORTED_REPORT, 0x81, 0x05]),
            vec![EventKind::MeterSupported {
                meter_type: MeterType::Electric,
                can_reset: true,
                scales: vec![MeterScale::ElectricKwh, MeterScale::ElectricW],
            }]
        );
        assert_eq!(meter.meter_type(), Some(MeterType::Electric));
    }

    #[test]
    fn test_decode_invalid_size() {
        let mut meter = handler::<MeterHandler>(2);
        assert!(decode(&mut meter, &[REPORT, 0x21, 0x33, 0x00, 0x00, 0x01]).is_empty());
    }

    #[test]
    fn test_encode() {
        let meter = handler::<MeterHandler>(1);
        assert_eq!(payload(&meter.encode_get(Some(MeterScale::ElectricW))), vec![0x32, 0x01]);
        assert!(meter.encode_reset().is_err());

        let meter = handler::<MeterHandler>(2);
        assert_eq!(
            payload(&meter.encode_get(Some(MeterScale::ElectricW))),
            vec![0x32, 0x01, 0x10]
        );
        assert_eq!(payload(&meter.encode_reset().unwrap()), vec![0x32, 0x05]);
        assert_eq!(payload(&meter.encode_supported_get().unwrap()), vec![0x32, 0x03]);
    }
}
