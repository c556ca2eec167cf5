//! CardNumber and FullCardNumber
//!
//! The 16-byte card number has two shapes, chosen by the card type that
//! accompanies it: driver cards carry a 14-character driver identification,
//! workshop, control and company cards a 13-character owner identification
//! plus a consecutive index.

use serde::{Deserialize, Serialize};
use std::fmt;
use tacho_core::datatypes::Ia5String;
use tacho_core::enums::{EquipmentType, NationNumeric, WireEnum};
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoError, TachoResult, Version};

/// Card number, in the shape selected by the card type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardNumber {
    Driver {
        identification: Ia5String,
        replacement_index: Ia5String,
        renewal_index: Ia5String,
    },
    Owner {
        identification: Ia5String,
        consecutive_index: Ia5String,
        replacement_index: Ia5String,
        renewal_index: Ia5String,
    },
}

impl CardNumber {
    pub const LENGTH: usize = 16;
    pub const DRIVER_IDENTIFICATION_LENGTH: usize = 14;
    pub const OWNER_IDENTIFICATION_LENGTH: usize = 13;

    pub fn driver(identification: &str, replacement_index: &str, renewal_index: &str) -> Self {
        CardNumber::Driver {
            identification: Ia5String::new(identification),
            replacement_index: Ia5String::new(replacement_index),
            renewal_index: Ia5String::new(renewal_index),
        }
    }

    pub fn owner(identification: &str, consecutive_index: &str, replacement_index: &str, renewal_index: &str) -> Self {
        CardNumber::Owner {
            identification: Ia5String::new(identification),
            consecutive_index: Ia5String::new(consecutive_index),
            replacement_index: Ia5String::new(replacement_index),
            renewal_index: Ia5String::new(renewal_index),
        }
    }

    /// Decode in the shape used by `card_type`
    ///
    /// # Errors
    /// [`TachoError::UnknownDiscriminant`] when `card_type` is not a card.
    pub fn decode_for(card_type: EquipmentType, data: &[u8]) -> TachoResult<Self> {
        match card_type {
            EquipmentType::DriverCard => Self::decode_driver(data),
            EquipmentType::WorkshopCard | EquipmentType::ControlCard | EquipmentType::CompanyCard => {
                Self::decode_owner(data)
            }
            other => Err(TachoError::UnknownDiscriminant {
                context: "CardNumber",
                value: other.to_wire().map_or(0, u32::from),
            }),
        }
    }

    pub fn decode_driver(data: &[u8]) -> TachoResult<Self> {
        expect_length("CardNumber", data, Self::LENGTH)?;
        let mut reader = RecordReader::new("CardNumber", data);
        let identification = Ia5String::decode(reader.read_bytes(Self::DRIVER_IDENTIFICATION_LENGTH)?);
        let replacement_index = Ia5String::decode(reader.read_bytes(1)?);
        let renewal_index = Ia5String::decode(reader.read_bytes(1)?);
        reader.finish()?;
        Ok(CardNumber::Driver {
            identification,
            replacement_index,
            renewal_index,
        })
    }

    pub fn decode_owner(data: &[u8]) -> TachoResult<Self> {
        expect_length("CardNumber", data, Self::LENGTH)?;
        let mut reader = RecordReader::new("CardNumber", data);
        let identification = Ia5String::decode(reader.read_bytes(Self::OWNER_IDENTIFICATION_LENGTH)?);
        let consecutive_index = Ia5String::decode(reader.read_bytes(1)?);
        let replacement_index = Ia5String::decode(reader.read_bytes(1)?);
        let renewal_index = Ia5String::decode(reader.read_bytes(1)?);
        reader.finish()?;
        Ok(CardNumber::Owner {
            identification,
            consecutive_index,
            replacement_index,
            renewal_index,
        })
    }

    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::zeroed("CardNumber", Self::LENGTH);
        match self {
            CardNumber::Driver {
                identification,
                replacement_index,
                renewal_index,
            } => {
                let width = Self::DRIVER_IDENTIFICATION_LENGTH;
                canvas.paint(width, &identification.encode(width)?)?;
                canvas.paint(1, &replacement_index.encode(1)?)?;
                canvas.paint(1, &renewal_index.encode(1)?)?;
            }
            CardNumber::Owner {
                identification,
                consecutive_index,
                replacement_index,
                renewal_index,
            } => {
                let width = Self::OWNER_IDENTIFICATION_LENGTH;
                canvas.paint(width, &identification.encode(width)?)?;
                canvas.paint(1, &consecutive_index.encode(1)?)?;
                canvas.paint(1, &replacement_index.encode(1)?)?;
                canvas.paint(1, &renewal_index.encode(1)?)?;
            }
        }
        canvas.finish()
    }

    pub fn identification(&self) -> &str {
        match self {
            CardNumber::Driver { identification, .. } | CardNumber::Owner { identification, .. } => {
                identification.value()
            }
        }
    }

    /// Whether this shape is the one `card_type` uses
    pub fn fits(&self, card_type: EquipmentType) -> bool {
        match self {
            CardNumber::Driver { .. } => card_type == EquipmentType::DriverCard,
            CardNumber::Owner { .. } => card_type.is_card() && card_type != EquipmentType::DriverCard,
        }
    }

    pub fn clear_raw(&mut self) {
        match self {
            CardNumber::Driver {
                identification,
                replacement_index,
                renewal_index,
            } => {
                identification.clear_raw();
                replacement_index.clear_raw();
                renewal_index.clear_raw();
            }
            CardNumber::Owner {
                identification,
                consecutive_index,
                replacement_index,
                renewal_index,
            } => {
                identification.clear_raw();
                consecutive_index.clear_raw();
                replacement_index.clear_raw();
                renewal_index.clear_raw();
            }
        }
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardNumber::Driver {
                identification,
                replacement_index,
                renewal_index,
            } => write!(f, "{}{}{}", identification, replacement_index, renewal_index),
            CardNumber::Owner {
                identification,
                consecutive_index,
                replacement_index,
                renewal_index,
            } => write!(
                f,
                "{}{}{}{}",
                identification, consecutive_index, replacement_index, renewal_index
            ),
        }
    }
}

/// Card type, issuing member state and card number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullCardNumber {
    pub card_type: EquipmentType,
    pub issuing_member_state: NationNumeric,
    pub card_number: CardNumber,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl FullCardNumber {
    pub const LENGTH: usize = 18;

    pub fn new(card_type: EquipmentType, issuing_member_state: NationNumeric, card_number: CardNumber) -> Self {
        Self {
            card_type,
            issuing_member_state,
            card_number,
            raw_data: None,
        }
    }

    /// Decode a card number field that may hold no card
    ///
    /// All-zero bytes mean no card was involved.
    pub fn decode_optional(data: &[u8]) -> TachoResult<Option<Self>> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        if data.iter().all(|&b| b == 0) {
            return Ok(None);
        }
        Self::decode(data, &Version::default()).map(Some)
    }
}

impl Record for FullCardNumber {
    const NAME: &'static str = "FullCardNumber";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let card_type: EquipmentType = reader.read_enum()?;
        if !card_type.is_card() {
            return Err(TachoError::UnknownDiscriminant {
                context: Self::NAME,
                value: u32::from(data[0]),
            });
        }
        let issuing_member_state = reader.read_enum()?;
        let card_number = CardNumber::decode_for(card_type, reader.read_bytes(CardNumber::LENGTH)?)?;
        reader.finish()?;
        Ok(Self {
            card_type,
            issuing_member_state,
            card_number,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        if !self.card_number.fits(self.card_type) {
            return Err(TachoError::InvalidData(format!(
                "FullCardNumber: card number shape does not match {:?}",
                self.card_type
            )));
        }
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_enum(&self.card_type)?;
        canvas.paint_enum(&self.issuing_member_state)?;
        canvas.paint(CardNumber::LENGTH, &self.card_number.encode()?)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.card_number.clear_raw();
    }
}

impl fmt::Display for FullCardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}/{}", self.card_type, self.issuing_member_state, self.card_number)
    }
}
