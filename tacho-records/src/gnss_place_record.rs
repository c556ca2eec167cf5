//! GnssPlaceRecord
//!
//! Version 2 cards append the position authentication status
//! (`GNSSPlaceAuthRecord`), taking the record from 11 to 12 bytes.

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{GeoCoordinates, TimeReal};
use tacho_core::enums::PositionAuthenticationStatus;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoError, TachoResult, Version};

/// Position determined by the GNSS receiver at a given time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GnssPlaceRecord {
    pub time_stamp: Option<TimeReal>,
    /// Accuracy of the position, in tenths of HDOP; 0..=100
    pub gnss_accuracy: u8,
    pub geo_coordinates: GeoCoordinates,
    /// Data version 2 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_status: Option<PositionAuthenticationStatus>,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl GnssPlaceRecord {
    pub const LENGTH: usize = 11;
    pub const AUTH_LENGTH: usize = 12;

    pub fn new(time_stamp: Option<TimeReal>, gnss_accuracy: u8, geo_coordinates: GeoCoordinates) -> Self {
        Self {
            time_stamp,
            gnss_accuracy,
            geo_coordinates,
            authentication_status: None,
            raw_data: None,
        }
    }
}

impl Record for GnssPlaceRecord {
    const NAME: &'static str = "GnssPlaceRecord";
    const GENERATION_DEPENDENT: bool = true;

    fn size(version: &Version) -> usize {
        if version.has_position_authentication() {
            Self::AUTH_LENGTH
        } else {
            Self::LENGTH
        }
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::size(version))?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let time_stamp = reader.read_time_real()?;
        let gnss_accuracy = reader.read_u8()?;
        let geo_coordinates = GeoCoordinates::decode(reader.read_bytes(6)?)?;
        let authentication_status = if version.has_position_authentication() {
            Some(reader.read_enum()?)
        } else {
            None
        };
        reader.finish()?;
        Ok(Self {
            time_stamp,
            gnss_accuracy,
            geo_coordinates,
            authentication_status,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let authenticated = version.has_position_authentication();
        if !authenticated && self.authentication_status.is_some() {
            return Err(TachoError::InvalidData(
                "GnssPlaceRecord: authentication status needs a data version 2 context".to_string(),
            ));
        }
        let mut canvas = Canvas::new(Self::NAME, Self::size(version), self.raw_data.as_deref());
        canvas.paint_time_real(self.time_stamp)?;
        canvas.paint_u8(self.gnss_accuracy)?;
        canvas.paint(6, &self.geo_coordinates.encode())?;
        if authenticated {
            match &self.authentication_status {
                Some(status) => canvas.paint_enum(status)?,
                None => canvas.skip(1)?,
            }
        }
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
    }
}
