//! VehicleRegistrationIdentification

use serde::{Deserialize, Serialize};
use std::fmt;
use tacho_core::datatypes::CodePageString;
use tacho_core::enums::{CodePage, NationNumeric};
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

/// Registering member state and registration number of a vehicle
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleRegistrationIdentification {
    pub nation: NationNumeric,
    pub number: CodePageString,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl VehicleRegistrationIdentification {
    pub const LENGTH: usize = 15;
    /// Code page selector plus 13 characters
    pub const NUMBER_LENGTH: usize = 14;

    pub fn new(nation: NationNumeric, code_page: CodePage, number: impl Into<String>) -> Self {
        Self {
            nation,
            number: CodePageString::new(code_page, number),
            raw_data: None,
        }
    }

    pub fn raw_data(&self) -> Option<&[u8]> {
        self.raw_data.as_deref()
    }
}

impl Record for VehicleRegistrationIdentification {
    const NAME: &'static str = "VehicleRegistrationIdentification";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let nation = reader.read_enum()?;
        let number = CodePageString::decode(reader.read_bytes(Self::NUMBER_LENGTH)?)?;
        reader.finish()?;
        Ok(Self {
            nation,
            number,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_enum(&self.nation)?;
        canvas.paint(Self::NUMBER_LENGTH, &self.number.encode(Self::NUMBER_LENGTH)?)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.number.clear_raw();
    }
}

impl fmt::Display for VehicleRegistrationIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.nation, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::TachoError;

    fn sample_bytes() -> Vec<u8> {
        let mut data = vec![0x0D, 0x01];
        data.extend_from_slice(b"B-TC 1234    ");
        data
    }

    #[test]
    fn test_decode() {
        let record = VehicleRegistrationIdentification::decode(&sample_bytes(), &Version::GEN1).unwrap();
        assert_eq!(record.nation, NationNumeric::Germany);
        assert_eq!(record.number.code_page(), CodePage::Iso8859_1);
        assert_eq!(record.number.value(), "B-TC 1234");
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let data = sample_bytes();
        let record = VehicleRegistrationIdentification::decode(&data, &Version::GEN2).unwrap();
        assert_eq!(record.encode(&Version::GEN2).unwrap(), data);
    }

    #[test]
    fn test_encode_from_scratch_pads_number() {
        let record = VehicleRegistrationIdentification::new(NationNumeric::Germany, CodePage::Iso8859_1, "B-TC 1234");
        assert_eq!(record.encode(&Version::GEN1).unwrap(), sample_bytes());
    }

    #[test]
    fn test_wrong_length() {
        let result = VehicleRegistrationIdentification::decode(&[0u8; 14], &Version::GEN1);
        assert!(matches!(
            result,
            Err(TachoError::InvalidLength {
                expected: 15,
                actual: 14,
                ..
            })
        ));
    }

    #[test]
    fn test_unspecified_nation_has_no_wire_code() {
        let record = VehicleRegistrationIdentification::default();
        assert!(matches!(
            record.encode(&Version::GEN1),
            Err(TachoError::NoWireCode { .. })
        ));
    }
}
