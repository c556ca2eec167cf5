//! GnssAccumulatedDrivingRecord
//!
//! 18 bytes, or 19 on data version 2 cards (`GNSSAuthAccumulatedDriving`).

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{OdometerShort, TimeReal};
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

use crate::gnss_place_record::GnssPlaceRecord;

/// Position recorded each time accumulated driving reaches three hours
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GnssAccumulatedDrivingRecord {
    pub time_stamp: Option<TimeReal>,
    pub gnss_place_record: GnssPlaceRecord,
    pub vehicle_odometer_value: OdometerShort,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl GnssAccumulatedDrivingRecord {
    pub const LENGTH: usize = 18;
    pub const AUTH_LENGTH: usize = 19;
}

impl Record for GnssAccumulatedDrivingRecord {
    const NAME: &'static str = "GnssAccumulatedDrivingRecord";
    const GENERATION_DEPENDENT: bool = true;

    fn size(version: &Version) -> usize {
        4 + GnssPlaceRecord::size(version) + OdometerShort::LENGTH
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::size(version))?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let time_stamp = reader.read_time_real()?;
        let gnss_place_record = GnssPlaceRecord::decode(reader.read_bytes(GnssPlaceRecord::size(version))?, version)?;
        let vehicle_odometer_value = OdometerShort::decode(reader.read_bytes(OdometerShort::LENGTH)?)?;
        reader.finish()?;
        Ok(Self {
            time_stamp,
            gnss_place_record,
            vehicle_odometer_value,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::size(version), self.raw_data.as_deref());
        canvas.paint_time_real(self.time_stamp)?;
        canvas.paint(GnssPlaceRecord::size(version), &self.gnss_place_record.encode(version)?)?;
        canvas.paint(OdometerShort::LENGTH, &self.vehicle_odometer_value.encode()?)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.gnss_place_record.clear_raw_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::datatypes::GeoCoordinates;

    #[test]
    fn test_round_trip() {
        let mut data = vec![0x5F, 0xEE, 0xA3, 0x40];
        data.extend_from_slice(&[0x5F, 0xEE, 0xA3, 0x3A, 0x0A, 0x00, 0x14, 0x88, 0x00, 0x05, 0x3E]);
        data.extend_from_slice(&[0x01, 0xE3, 0x1C]);
        let record = GnssAccumulatedDrivingRecord::decode(&data, &Version::GEN2).unwrap();
        assert_eq!(record.gnss_place_record.geo_coordinates, GeoCoordinates::new(5256, 1342));
        assert_eq!(record.vehicle_odometer_value.km(), 123_676);
        assert_eq!(record.encode(&Version::GEN2).unwrap(), data);
    }

    #[test]
    fn test_size_follows_data_version() {
        assert_eq!(GnssAccumulatedDrivingRecord::size(&Version::GEN2), GnssAccumulatedDrivingRecord::LENGTH);
        assert_eq!(GnssAccumulatedDrivingRecord::size(&Version::GEN2_V2), GnssAccumulatedDrivingRecord::AUTH_LENGTH);

        let mut data = vec![0x5F, 0xEE, 0xA3, 0x40];
        data.extend_from_slice(&[0x5F, 0xEE, 0xA3, 0x3A, 0x0A, 0x00, 0x14, 0x88, 0x00, 0x05, 0x3E, 0x01]);
        data.extend_from_slice(&[0x01, 0xE3, 0x1C]);
        assert!(GnssAccumulatedDrivingRecord::decode(&data, &Version::GEN2).is_err());
        let record = GnssAccumulatedDrivingRecord::decode(&data, &Version::GEN2_V2).unwrap();
        assert_eq!(record.vehicle_odometer_value.km(), 123_676);
        assert!(record.gnss_place_record.authentication_status.is_some());
        assert_eq!(record.encode(&Version::GEN2_V2).unwrap(), data);
    }
}
