//! Meter Table Monitor command class (0x3D)
//!
//! Utility meters expose an id, an administration number, capabilities and
//! current data per dataset. Current data values are 4-byte big-endian
//! unsigned integers scaled by their own precision field.

use chrono::NaiveDate;
use zwrust_core::{PayloadCursor, SendData, StringEncoding};
use zwrust_types::{CommandClassId, Decimal, EventKind, MeterTableValue, MeterType, RateType};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const POINT_ADM_NUMBER_GET: u8 = 0x01;
const POINT_ADM_NUMBER_REPORT: u8 = 0x02;
const ID_GET: u8 = 0x03;
const ID_REPORT: u8 = 0x04;
const CAPABILITY_GET: u8 = 0x05;
const CAPABILITY_REPORT: u8 = 0x06;
const CURRENT_DATA_GET: u8 = 0x0C;
const CURRENT_DATA_REPORT: u8 = 0x0D;

/// Datasets are a 24-bit mask
const DATASET_MASK: u32 = 0x00FF_FFFF;

#[derive(Debug)]
pub struct MeterTableMonitorHandler {
    base: HandlerBase,
}

impl MeterTableMonitorHandler {
    pub fn encode_point_adm_number_get(&self) -> SendData {
        self.base.message(POINT_ADM_NUMBER_GET, &[])
    }

    pub fn encode_id_get(&self) -> SendData {
        self.base.message(ID_GET, &[])
    }

    pub fn encode_capability_get(&self) -> SendData {
        self.base.message(CAPABILITY_GET, &[])
    }

    /// Request current values for the datasets in `datasets` (24-bit mask)
    pub fn encode_current_data_get(&self, datasets: u32) -> Result<SendData> {
        if datasets == 0 || datasets & !DATASET_MASK != 0 {
            return Err(Error::InvalidArgument(format!(
                "dataset mask 0x{:X} must be a non-zero 24-bit value",
                datasets
            )));
        }
        let bytes = datasets.to_be_bytes();
        Ok(self.base.message(CURRENT_DATA_GET, &bytes[1..]))
    }

    fn read_label(cursor: &mut PayloadCursor<'_>) -> std::result::Result<String, DecodeError> {
        let len = usize::from(cursor.read_u8()? & 0x1F);
        Ok(cursor.read_fixed_string(len, StringEncoding::Ascii)?)
    }

    fn decode_current_data(
        cursor: &mut PayloadCursor<'_>,
    ) -> std::result::Result<EventKind, DecodeError> {
        let _reports_to_follow = cursor.read_u8()?;
        let rate_type = RateType::from_u8(cursor.read_u8()? & 0x03);
        let datasets = cursor.read_u24()?;

        let year = cursor.read_u16()?;
        let month = cursor.read_u8()?;
        let day = cursor.read_u8()?;
        let hour = cursor.read_u8()?;
        let minute = cursor.read_u8()?;
        let second = cursor.read_u8()?;
        let timestamp = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .and_then(|date| date.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second)));

        let mut values = Vec::new();
        for dataset in 0..24u8 {
            if datasets & (1 << dataset) == 0 {
                continue;
            }
            let properties = cursor.read_u8()?;
            let raw = cursor.read_u32()?;
            values.push(MeterTableValue {
                dataset,
                scale: properties & 0x1F,
                value: Decimal::new(i64::from(raw), properties >> 5),
            });
        }

        Ok(EventKind::MeterTableCurrentData {
            rate_type,
            datasets,
            timestamp,
            values,
        })
    }
}

impl HandlerType for MeterTableMonitorHandler {
    const ID: CommandClassId = CommandClassId::MeterTableMonitor;
    const MAX_VERSION: u8 = 2;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
        }
    }
}

impl CommandClassHandler for MeterTableMonitorHandler {
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
            POINT_ADM_NUMBER_REPORT => {
                let number = Self::read_label(cursor)?;
                out.push(EventKind::MeterTablePointAdm { number });
            }
            ID_REPORT => {
                let id = Self::read_label(cursor)?;
                out.push(EventKind::MeterTableId { id });
            }
            CAPABILITY_REPORT => {
                let properties = cursor.read_u8()?;
                let pay_meter = cursor.read_u8()? & 0x0F;
                let datasets = cursor.read_u24()?;
                out.push(EventKind::MeterTableCapability {
                    meter_type: MeterType::from_u8(properties & 0x3F),
                    rate_type: RateType::from_u8(properties >> 6),
                    pay_meter,
                    datasets,
                });
            }
            CURRENT_DATA_REPORT => out.push(Self::decode_current_data(cursor)?),
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
