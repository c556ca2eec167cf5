//! CardIccIdentification and CardChipIdentification

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::Ia5String;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

use crate::extended_serial_number::ExtendedSerialNumber;

/// Identifier of the module embedder and IC assembler
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmbedderIcAssemblerId {
    /// Alpha-2 country code
    pub country_code: Ia5String,
    /// 4 BCD digits, kept as read
    pub module_embedder: u16,
    pub manufacturer_information: u8,
}

impl EmbedderIcAssemblerId {
    pub const LENGTH: usize = 5;

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_length("EmbedderIcAssemblerId", data, Self::LENGTH)?;
        let mut reader = RecordReader::new("EmbedderIcAssemblerId", data);
        let country_code = Ia5String::decode(reader.read_bytes(2)?);
        let module_embedder = reader.read_u16()?;
        let manufacturer_information = reader.read_u8()?;
        reader.finish()?;
        Ok(Self {
            country_code,
            module_embedder,
            manufacturer_information,
        })
    }

    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::zeroed("EmbedderIcAssemblerId", Self::LENGTH);
        canvas.paint(2, &self.country_code.encode(2)?)?;
        canvas.paint_u16(self.module_embedder)?;
        canvas.paint_u8(self.manufacturer_information)?;
        canvas.finish()
    }
}

/// Identification of the card's integrated circuit card
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardIccIdentification {
    pub clock_stop: u8,
    pub card_extended_serial_number: ExtendedSerialNumber,
    pub card_approval_number: Ia5String,
    pub card_personaliser_id: u8,
    pub embedder_ic_assembler_id: EmbedderIcAssemblerId,
    pub ic_identifier: [u8; 2],
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl CardIccIdentification {
    pub const LENGTH: usize = 25;
    pub const APPROVAL_NUMBER_LENGTH: usize = 8;
}

impl Record for CardIccIdentification {
    const NAME: &'static str = "CardIccIdentification";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let clock_stop = reader.read_u8()?;
        let card_extended_serial_number =
            ExtendedSerialNumber::decode(reader.read_bytes(ExtendedSerialNumber::LENGTH)?, version)?;
        let card_approval_number = Ia5String::decode(reader.read_bytes(Self::APPROVAL_NUMBER_LENGTH)?);
        let card_personaliser_id = reader.read_u8()?;
        let embedder_ic_assembler_id = EmbedderIcAssemblerId::decode(reader.read_bytes(EmbedderIcAssemblerId::LENGTH)?)?;
        let ic_identifier = reader.read_array()?;
        reader.finish()?;
        Ok(Self {
            clock_stop,
            card_extended_serial_number,
            card_approval_number,
            card_personaliser_id,
            embedder_ic_assembler_id,
            ic_identifier,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_u8(self.clock_stop)?;
        canvas.paint(
            ExtendedSerialNumber::LENGTH,
            &self.card_extended_serial_number.encode(version)?,
        )?;
        canvas.paint(
            Self::APPROVAL_NUMBER_LENGTH,
            &self.card_approval_number.encode(Self::APPROVAL_NUMBER_LENGTH)?,
        )?;
        canvas.paint_u8(self.card_personaliser_id)?;
        canvas.paint(EmbedderIcAssemblerId::LENGTH, &self.embedder_ic_assembler_id.encode()?)?;
        canvas.paint_bytes(&self.ic_identifier)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.card_extended_serial_number.clear_raw_data();
        self.card_approval_number.clear_raw();
        self.embedder_ic_assembler_id.country_code.clear_raw();
    }
}

/// Serial number and manufacturing references of the chip
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardChipIdentification {
    pub ic_serial_number: [u8; 4],
    pub ic_manufacturing_references: [u8; 4],
}

impl CardChipIdentification {
    pub const LENGTH: usize = 8;
}

impl Record for CardChipIdentification {
    const NAME: &'static str = "CardChipIdentification";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let ic_serial_number = reader.read_array()?;
        let ic_manufacturing_references = reader.read_array()?;
        reader.finish()?;
        Ok(Self {
            ic_serial_number,
            ic_manufacturing_references,
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::zeroed(Self::NAME, Self::LENGTH);
        canvas.paint_bytes(&self.ic_serial_number)?;
        canvas.paint_bytes(&self.ic_manufacturing_references)?;
        canvas.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::enums::EquipmentType;

    fn icc_bytes() -> Vec<u8> {
        let mut data = vec![0x05];
        data.extend_from_slice(&[0x00, 0x01, 0xE2, 0x40, 0x07, 0x19, 0x01, 0xA1]);
        data.extend_from_slice(b"e1-0001 ");
        data.push(0x2A);
        data.extend_from_slice(b"DE");
        data.extend_from_slice(&[0x12, 0x34, 0x07]);
        data.extend_from_slice(&[0xAB, 0xCD]);
        data
    }

    #[test]
    fn test_icc_identification() {
        let data = icc_bytes();
        let icc = CardIccIdentification::decode(&data, &Version::GEN1).unwrap();
        assert_eq!(icc.clock_stop, 0x05);
        assert_eq!(icc.card_extended_serial_number.equipment_type, EquipmentType::DriverCard);
        assert_eq!(icc.card_approval_number.value(), "e1-0001");
        assert_eq!(icc.embedder_ic_assembler_id.country_code.value(), "DE");
        assert_eq!(icc.embedder_ic_assembler_id.module_embedder, 0x1234);
        assert_eq!(icc.ic_identifier, [0xAB, 0xCD]);
        assert_eq!(icc.encode(&Version::GEN1).unwrap(), data);
    }

    #[test]
    fn test_icc_without_raw_data() {
        let data = icc_bytes();
        let mut icc = CardIccIdentification::decode(&data, &Version::GEN1).unwrap();
        icc.clear_raw_data();
        assert_eq!(icc.encode(&Version::GEN1).unwrap(), data);
    }

    #[test]
    fn test_chip_identification() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let chip = CardChipIdentification::decode(&data, &Version::GEN2).unwrap();
        assert_eq!(chip.ic_serial_number, [1, 2, 3, 4]);
        assert_eq!(chip.encode(&Version::GEN2).unwrap(), data);
        assert!(CardChipIdentification::decode(&data[..7], &Version::GEN2).is_err());
    }
}
