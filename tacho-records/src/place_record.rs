//! PlaceRecord
//!
//! Generation 2 appends the GNSS position of the entry, taking the record
//! from 10 to 21 bytes, or 22 on data version 2 cards (`PlaceAuthRecord`).

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{OdometerShort, TimeReal};
use tacho_core::enums::{EntryTypeDailyWorkPeriod, NationNumeric};
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoError, TachoResult, Version};

use crate::gnss_place_record::GnssPlaceRecord;

/// Place where a daily work period begins or ends
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub entry_time: Option<TimeReal>,
    pub entry_type: EntryTypeDailyWorkPeriod,
    pub daily_work_period_country: NationNumeric,
    pub daily_work_period_region: u8,
    pub vehicle_odometer_value: OdometerShort,
    /// Generation 2 only
    pub entry_gnss_place_record: Option<GnssPlaceRecord>,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl PlaceRecord {
    pub const GEN1_LENGTH: usize = 10;
    pub const GEN2_LENGTH: usize = 21;
    pub const GEN2_AUTH_LENGTH: usize = 22;
}

impl Record for PlaceRecord {
    const NAME: &'static str = "PlaceRecord";
    const GENERATION_DEPENDENT: bool = true;

    fn size(version: &Version) -> usize {
        if version.is_gen2() {
            Self::GEN1_LENGTH + GnssPlaceRecord::size(version)
        } else {
            Self::GEN1_LENGTH
        }
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::size(version))?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let entry_time = reader.read_time_real()?;
        let entry_type = reader.read_enum()?;
        let daily_work_period_country = reader.read_enum()?;
        let daily_work_period_region = reader.read_u8()?;
        let vehicle_odometer_value = OdometerShort::decode(reader.read_bytes(OdometerShort::LENGTH)?)?;
        let entry_gnss_place_record = if version.is_gen2() {
            Some(GnssPlaceRecord::decode(
                reader.read_bytes(GnssPlaceRecord::size(version))?,
                version,
            )?)
        } else {
            None
        };
        reader.finish()?;
        Ok(Self {
            entry_time,
            entry_type,
            daily_work_period_country,
            daily_work_period_region,
            vehicle_odometer_value,
            entry_gnss_place_record,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        if !version.is_gen2() && self.entry_gnss_place_record.is_some() {
            return Err(TachoError::InvalidData(
                "PlaceRecord: GNSS position cannot be encoded in a generation 1 record".to_string(),
            ));
        }
        let mut canvas = Canvas::new(Self::NAME, Self::size(version), self.raw_data.as_deref());
        canvas.paint_time_real(self.entry_time)?;
        canvas.paint_enum(&self.entry_type)?;
        canvas.paint_enum(&self.daily_work_period_country)?;
        canvas.paint_u8(self.daily_work_period_region)?;
        canvas.paint(OdometerShort::LENGTH, &self.vehicle_odometer_value.encode()?)?;
        if version.is_gen2() {
            canvas.paint(
                GnssPlaceRecord::size(version),
                &GnssPlaceRecord::encode_optional(self.entry_gnss_place_record.as_ref(), Some(version))?,
            )?;
        }
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        if let Some(gnss) = &mut self.entry_gnss_place_record {
            gnss.clear_raw_data();
        }
    }
}
