//! Geographic coordinates
//!
//! Each coordinate is a 24-bit two's-complement value in the format
//! `±DDMM.M × 10` (degrees, minutes and tenths of a minute).

use crate::error::{expect_length, TachoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire value conventionally meaning "position unknown"
///
/// It is carried through like any other value.
pub const GEO_COORDINATE_UNKNOWN: i32 = 0x7F_FFFF;

/// Decode a 3-byte big-endian coordinate, sign-extended to 32 bits
pub fn decode_geo_coordinate(data: &[u8]) -> TachoResult<i32> {
    expect_length("GeoCoordinate", data, 3)?;
    let raw = (i32::from(data[0]) << 16) | (i32::from(data[1]) << 8) | i32::from(data[2]);
    // shift bit 23 into the sign position and back
    Ok((raw << 8) >> 8)
}

/// Encode the low 24 bits of `value`, big-endian
pub fn encode_geo_coordinate(value: i32) -> [u8; 3] {
    let bytes = value.to_be_bytes();
    [bytes[1], bytes[2], bytes[3]]
}

/// Latitude and longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub latitude: i32,
    pub longitude: i32,
}

impl GeoCoordinates {
    pub const LENGTH: usize = 6;

    pub fn new(latitude: i32, longitude: i32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_length("GeoCoordinates", data, Self::LENGTH)?;
        Ok(Self {
            latitude: decode_geo_coordinate(&data[0..3])?,
            longitude: decode_geo_coordinate(&data[3..6])?,
        })
    }

    pub fn encode(&self) -> [u8; 6] {
        let mut result = [0u8; 6];
        result[0..3].copy_from_slice(&encode_geo_coordinate(self.latitude));
        result[3..6].copy_from_slice(&encode_geo_coordinate(self.longitude));
        result
    }

    /// Whether either coordinate carries the "unknown" marker
    pub fn is_unknown(&self) -> bool {
        self.latitude == GEO_COORDINATE_UNKNOWN || self.longitude == GEO_COORDINATE_UNKNOWN
    }

    /// Latitude in decimal degrees
    pub fn latitude_degrees(&self) -> f64 {
        to_decimal_degrees(self.latitude)
    }

    /// Longitude in decimal degrees
    pub fn longitude_degrees(&self) -> f64 {
        to_decimal_degrees(self.longitude)
    }
}

/// Convert a `±DDMM.M × 10` value to decimal degrees
pub fn to_decimal_degrees(value: i32) -> f64 {
    let sign = if value < 0 { -1.0 } else { 1.0 };
    let magnitude = value.unsigned_abs();
    let degrees = f64::from(magnitude / 1000);
    let minutes = f64::from(magnitude % 1000) / 10.0;
    sign * (degrees + minutes / 60.0)
}

impl fmt::Display for GeoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return write!(f, "unknown");
        }
        write!(
            f,
            "{:.5},{:.5}",
            self.latitude_degrees(),
            self.longitude_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_extension() {
        assert_eq!(decode_geo_coordinate(&[0x80, 0x00, 0x00]).unwrap(), -8_388_608);
        assert_eq!(decode_geo_coordinate(&[0x7F, 0xFF, 0xFF]).unwrap(), 8_388_607);
        assert_eq!(decode_geo_coordinate(&[0xFF, 0xFF, 0xFF]).unwrap(), -1);
        assert_eq!(decode_geo_coordinate(&[0x00, 0x00, 0x01]).unwrap(), 1);
    }

    #[test]
    fn test_round_trip_extremes() {
        for bytes in [[0x80, 0x00, 0x00], [0x7F, 0xFF, 0xFF], [0x00, 0xCC, 0x51]] {
            let value = decode_geo_coordinate(&bytes).unwrap();
            assert_eq!(encode_geo_coordinate(value), bytes);
        }
    }

    #[test]
    fn test_wrong_length() {
        assert!(decode_geo_coordinate(&[0x00, 0x01]).is_err());
        assert!(GeoCoordinates::decode(&[0u8; 5]).is_err());
    }

    #[test]
    fn test_unknown_marker_passes_through() {
        let data = [0x7F, 0xFF, 0xFF, 0x7F, 0xFF, 0xFF];
        let coords = GeoCoordinates::decode(&data).unwrap();
        assert!(coords.is_unknown());
        assert_eq!(coords.encode(), data);
    }

    #[test]
    fn test_decimal_degrees() {
        // 52°30.0' N, 13°24.6' E
        let coords = GeoCoordinates::new(52300, 13246);
        assert!((coords.latitude_degrees() - 52.5).abs() < 1e-9);
        assert!((coords.longitude_degrees() - 13.41).abs() < 1e-9);
        assert!((to_decimal_degrees(-52300) + 52.5).abs() < 1e-9);
    }
}
