//! Big-endian unsigned counters narrower than 32 bits

use crate::error::{expect_length, TachoError, TachoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decode a 2-byte big-endian counter
pub fn decode_u16(context: &'static str, data: &[u8]) -> TachoResult<u16> {
    expect_length(context, data, 2)?;
    Ok(u16::from_be_bytes([data[0], data[1]]))
}

/// Decode a 3-byte big-endian counter
pub fn decode_u24(context: &'static str, data: &[u8]) -> TachoResult<u32> {
    expect_length(context, data, 3)?;
    Ok(u32::from_be_bytes([0, data[0], data[1], data[2]]))
}

/// Encode a 3-byte big-endian counter
///
/// # Errors
/// [`TachoError::ValueTooLarge`] when `value` exceeds 0xFFFFFF.
pub fn encode_u24(context: &'static str, value: u32) -> TachoResult<[u8; 3]> {
    if value > 0xFF_FFFF {
        return Err(TachoError::ValueTooLarge {
            context,
            message: format!("{} does not fit in 24 bits", value),
        });
    }
    let bytes = value.to_be_bytes();
    Ok([bytes[1], bytes[2], bytes[3]])
}

/// Odometer value in km, 3 bytes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OdometerShort(u32);

impl OdometerShort {
    pub const LENGTH: usize = 3;
    pub const MAX: u32 = 0xFF_FFFF;

    /// Create an odometer value
    ///
    /// # Errors
    /// [`TachoError::ValueTooLarge`] above [`OdometerShort::MAX`].
    pub fn new(km: u32) -> TachoResult<Self> {
        encode_u24("OdometerShort", km)?;
        Ok(Self(km))
    }

    pub fn km(&self) -> u32 {
        self.0
    }

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        decode_u24("OdometerShort", data).map(Self)
    }

    pub fn encode(&self) -> TachoResult<[u8; 3]> {
        encode_u24("OdometerShort", self.0)
    }

    /// Distance from `self` to a later reading
    pub fn distance_to(&self, later: OdometerShort) -> u32 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for OdometerShort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u24_round_trip() {
        assert_eq!(decode_u24("t", &[0x01, 0x02, 0x03]).unwrap(), 0x010203);
        assert_eq!(encode_u24("t", 0x010203).unwrap(), [0x01, 0x02, 0x03]);
        assert!(encode_u24("t", 0x0100_0000).is_err());
    }

    #[test]
    fn test_counter_rejects_wrong_length() {
        assert!(decode_u16("t", &[0x01]).is_err());
        assert!(decode_u24("t", &[0x01, 0x02, 0x03, 0x04]).is_err());
    }

    #[test]
    fn test_odometer() {
        let begin = OdometerShort::decode(&[0x00, 0x30, 0x39]).unwrap();
        assert_eq!(begin.km(), 12345);
        let end = OdometerShort::new(12400).unwrap();
        assert_eq!(begin.distance_to(end), 55);
        assert_eq!(end.distance_to(begin), 0);
        assert!(OdometerShort::new(OdometerShort::MAX + 1).is_err());
    }
}
