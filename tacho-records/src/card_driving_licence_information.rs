//! CardDrivingLicenceInformation

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{CodePageString, Ia5String};
use tacho_core::enums::NationNumeric;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

use crate::card_identification::NAME_LENGTH;

/// Driving licence the card was issued against
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardDrivingLicenceInformation {
    pub driving_licence_issuing_authority: CodePageString,
    pub driving_licence_issuing_nation: NationNumeric,
    pub driving_licence_number: Ia5String,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl CardDrivingLicenceInformation {
    pub const LENGTH: usize = 53;
    pub const NUMBER_LENGTH: usize = 16;
}

impl Record for CardDrivingLicenceInformation {
    const NAME: &'static str = "CardDrivingLicenceInformation";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let driving_licence_issuing_authority = CodePageString::decode(reader.read_bytes(NAME_LENGTH)?)?;
        let driving_licence_issuing_nation = reader.read_enum()?;
        let driving_licence_number = Ia5String::decode(reader.read_bytes(Self::NUMBER_LENGTH)?);
        reader.finish()?;
        Ok(Self {
            driving_licence_issuing_authority,
            driving_licence_issuing_nation,
            driving_licence_number,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint(NAME_LENGTH, &self.driving_licence_issuing_authority.encode(NAME_LENGTH)?)?;
        canvas.paint_enum(&self.driving_licence_issuing_nation)?;
        canvas.paint(Self::NUMBER_LENGTH, &self.driving_licence_number.encode(Self::NUMBER_LENGTH)?)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.driving_licence_issuing_authority.clear_raw();
        self.driving_licence_number.clear_raw();
    }
}
