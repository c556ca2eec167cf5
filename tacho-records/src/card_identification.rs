//! CardIdentification and DriverCardHolderIdentification
//!
//! Together they make up the driver card's identification file: 65 bytes
//! of card data followed by 78 bytes about the holder.

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{CodePageString, Datef, Ia5String, TimeReal};
use tacho_core::enums::{EquipmentType, NationNumeric};
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

use crate::card_number::CardNumber;

/// Width of a code-paged name field, selector included
pub const NAME_LENGTH: usize = 36;

/// Card issuing and validity data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardIdentification {
    pub card_issuing_member_state: NationNumeric,
    pub card_number: CardNumber,
    pub card_issuing_authority_name: CodePageString,
    pub card_issue_date: Option<TimeReal>,
    pub card_validity_begin: Option<TimeReal>,
    pub card_expiry_date: Option<TimeReal>,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl CardIdentification {
    pub const LENGTH: usize = 65;

    /// Decode with the card number in the shape `card_type` uses
    pub fn decode_for(data: &[u8], card_type: EquipmentType) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let card_issuing_member_state = reader.read_enum()?;
        let card_number = CardNumber::decode_for(card_type, reader.read_bytes(CardNumber::LENGTH)?)?;
        let card_issuing_authority_name = CodePageString::decode(reader.read_bytes(NAME_LENGTH)?)?;
        let card_issue_date = reader.read_time_real()?;
        let card_validity_begin = reader.read_time_real()?;
        let card_expiry_date = reader.read_time_real()?;
        reader.finish()?;
        Ok(Self {
            card_issuing_member_state,
            card_number,
            card_issuing_authority_name,
            card_issue_date,
            card_validity_begin,
            card_expiry_date,
            raw_data: Some(data.to_vec()),
        })
    }
}

impl Record for CardIdentification {
    const NAME: &'static str = "CardIdentification";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    /// Decodes a driver card's identification
    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        Self::decode_for(data, EquipmentType::DriverCard)
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_enum(&self.card_issuing_member_state)?;
        canvas.paint(CardNumber::LENGTH, &self.card_number.encode()?)?;
        canvas.paint(NAME_LENGTH, &self.card_issuing_authority_name.encode(NAME_LENGTH)?)?;
        canvas.paint_time_real(self.card_issue_date)?;
        canvas.paint_time_real(self.card_validity_begin)?;
        canvas.paint_time_real(self.card_expiry_date)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.card_number.clear_raw();
        self.card_issuing_authority_name.clear_raw();
    }
}

/// Name, birth date and preferred language of the card holder
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DriverCardHolderIdentification {
    pub card_holder_surname: CodePageString,
    pub card_holder_first_names: CodePageString,
    pub card_holder_birth_date: Option<Datef>,
    /// ISO 639 two-letter code
    pub card_holder_preferred_language: Ia5String,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl DriverCardHolderIdentification {
    pub const LENGTH: usize = 78;
}

impl Record for DriverCardHolderIdentification {
    const NAME: &'static str = "DriverCardHolderIdentification";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let card_holder_surname = CodePageString::decode(reader.read_bytes(NAME_LENGTH)?)?;
        let card_holder_first_names = CodePageString::decode(reader.read_bytes(NAME_LENGTH)?)?;
        let card_holder_birth_date = Datef::decode(reader.read_bytes(Datef::LENGTH)?)?;
        let card_holder_preferred_language = Ia5String::decode(reader.read_bytes(2)?);
        reader.finish()?;
        Ok(Self {
            card_holder_surname,
            card_holder_first_names,
            card_holder_birth_date,
            card_holder_preferred_language,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint(NAME_LENGTH, &self.card_holder_surname.encode(NAME_LENGTH)?)?;
        canvas.paint(NAME_LENGTH, &self.card_holder_first_names.encode(NAME_LENGTH)?)?;
        canvas.paint(Datef::LENGTH, &Datef::encode(self.card_holder_birth_date.as_ref())?)?;
        canvas.paint(2, &self.card_holder_preferred_language.encode(2)?)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.card_holder_surname.clear_raw();
        self.card_holder_first_names.clear_raw();
        self.card_holder_preferred_language.clear_raw();
    }
}
