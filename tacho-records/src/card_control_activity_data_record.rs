//! CardControlActivityDataRecord and its ControlType bit field

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::TimeReal;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

use crate::card_number::FullCardNumber;
use crate::vehicle_registration::VehicleRegistrationIdentification;

/// Kind of control, bit-packed `c v p d r r r r`
///
/// `c` card downloaded, `v` VU downloaded, `p` printing, `d` display. The
/// low four bits are reserved; they are kept as read so they re-encode
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ControlType {
    pub card_downloading: bool,
    pub vu_downloading: bool,
    pub printing: bool,
    pub display: bool,
    reserved: u8,
}

impl ControlType {
    const CARD_DOWNLOADING: u8 = 0x80;
    const VU_DOWNLOADING: u8 = 0x40;
    const PRINTING: u8 = 0x20;
    const DISPLAY: u8 = 0x10;
    const RESERVED_MASK: u8 = 0x0F;

    pub fn new(card_downloading: bool, vu_downloading: bool, printing: bool, display: bool) -> Self {
        Self {
            card_downloading,
            vu_downloading,
            printing,
            display,
            reserved: 0,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        Self {
            card_downloading: value & Self::CARD_DOWNLOADING != 0,
            vu_downloading: value & Self::VU_DOWNLOADING != 0,
            printing: value & Self::PRINTING != 0,
            display: value & Self::DISPLAY != 0,
            reserved: value & Self::RESERVED_MASK,
        }
    }

    pub fn to_u8(&self) -> u8 {
        let mut value = self.reserved & Self::RESERVED_MASK;
        if self.card_downloading {
            value |= Self::CARD_DOWNLOADING;
        }
        if self.vu_downloading {
            value |= Self::VU_DOWNLOADING;
        }
        if self.printing {
            value |= Self::PRINTING;
        }
        if self.display {
            value |= Self::DISPLAY;
        }
        value
    }

    /// Reserved low bits as read
    pub fn reserved_bits(&self) -> u8 {
        self.reserved
    }
}

/// Last control the driver was subject to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardControlActivityDataRecord {
    pub control_type: ControlType,
    pub control_time: Option<TimeReal>,
    /// Card of the control officer; absent when never controlled
    pub control_card_number: Option<FullCardNumber>,
    pub control_vehicle_registration: VehicleRegistrationIdentification,
    pub control_download_period_begin: Option<TimeReal>,
    pub control_download_period_end: Option<TimeReal>,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl CardControlActivityDataRecord {
    pub const LENGTH: usize = 46;

    /// Whether the record holds no control at all
    pub fn is_empty(&self) -> bool {
        self.control_time.is_none() && self.control_card_number.is_none()
    }
}

impl Record for CardControlActivityDataRecord {
    const NAME: &'static str = "CardControlActivityDataRecord";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let control_type = ControlType::from_u8(reader.read_u8()?);
        let control_time = reader.read_time_real()?;
        let control_card_number = FullCardNumber::decode_optional(reader.read_bytes(FullCardNumber::LENGTH)?)?;
        let vehicle_bytes = reader.read_bytes(VehicleRegistrationIdentification::LENGTH)?;
        let control_vehicle_registration = VehicleRegistrationIdentification::decode(vehicle_bytes, version)?;
        let control_download_period_begin = reader.read_time_real()?;
        let control_download_period_end = reader.read_time_real()?;
        reader.finish()?;
        Ok(Self {
            control_type,
            control_time,
            control_card_number,
            control_vehicle_registration,
            control_download_period_begin,
            control_download_period_end,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_u8(self.control_type.to_u8())?;
        canvas.paint_time_real(self.control_time)?;
        canvas.paint(
            FullCardNumber::LENGTH,
            &FullCardNumber::encode_optional(self.control_card_number.as_ref(), Some(version))?,
        )?;
        canvas.paint(
            VehicleRegistrationIdentification::LENGTH,
            &self.control_vehicle_registration.encode(version)?,
        )?;
        canvas.paint_time_real(self.control_download_period_begin)?;
        canvas.paint_time_real(self.control_download_period_end)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        if let Some(number) = &mut self.control_card_number {
            number.clear_raw_data();
        }
        self.control_vehicle_registration.clear_raw_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_number::CardNumber;
    use tacho_core::enums::{EquipmentType, NationNumeric};

    fn control_bytes(control_type: u8) -> Vec<u8> {
        let mut data = vec![control_type, 0x5F, 0xEE, 0x66, 0x00];
        data.extend_from_slice(&[0x03, 0x0D]);
        data.extend_from_slice(b"C000000000007");
        data.extend_from_slice(b"000");
        data.extend_from_slice(&[0x0D, 0x01]);
        data.extend_from_slice(b"B-TC 1234    ");
        data.extend_from_slice(&[0x5F, 0xE0, 0x00, 0x00]);
        data.extend_from_slice(&[0x5F, 0xEE, 0x66, 0x00]);
        data
    }

    #[test]
    fn test_control_type_bits() {
        let control_type = ControlType::from_u8(0xA5);
        assert!(control_type.card_downloading);
        assert!(!control_type.vu_downloading);
        assert!(control_type.printing);
        assert!(!control_type.display);
        assert_eq!(control_type.reserved_bits(), 0x05);
        assert_eq!(control_type.to_u8(), 0xA5);
        assert_eq!(ControlType::new(false, true, false, true).to_u8(), 0x50);
    }

    #[test]
    fn test_reserved_bits_survive_flag_change() {
        let data = control_bytes(0x8F);
        let mut record = CardControlActivityDataRecord::decode(&data, &Version::GEN1).unwrap();
        record.control_type.display = true;
        record.clear_raw_data();
        let encoded = record.encode(&Version::GEN1).unwrap();
        assert_eq!(encoded[0], 0x9F);
        assert_eq!(&encoded[1..], &data[1..]);
    }

    #[test]
    fn test_decode_control() {
        let data = control_bytes(0xC0);
        let record = CardControlActivityDataRecord::decode(&data, &Version::GEN1).unwrap();
        let card = record.control_card_number.as_ref().unwrap();
        assert_eq!(card.card_type, EquipmentType::ControlCard);
        assert_eq!(card.card_number.identification(), "C000000000007");
        assert_eq!(record.control_vehicle_registration.nation, NationNumeric::Germany);
        assert!(!record.is_empty());
        assert_eq!(record.encode(&Version::GEN1).unwrap(), data);
    }

    #[test]
    fn test_never_controlled() {
        let record = CardControlActivityDataRecord::decode(&[0u8; 46], &Version::GEN1).unwrap();
        assert!(record.is_empty());
        assert!(record.control_card_number.is_none());
        assert_eq!(record.encode(&Version::GEN1).unwrap(), vec![0u8; 46]);
    }

    #[test]
    fn test_built_control() {
        let record = CardControlActivityDataRecord {
            control_type: ControlType::new(true, false, false, false),
            control_time: Some(TimeReal::from_seconds(0x5FEE_6600)),
            control_card_number: Some(FullCardNumber::new(
                EquipmentType::ControlCard,
                NationNumeric::Germany,
                CardNumber::owner("C000000000007", "0", "0", "0"),
            )),
            ..CardControlActivityDataRecord::decode(&control_bytes(0x80), &Version::GEN1).unwrap()
        };
        assert_eq!(record.encode(&Version::GEN1).unwrap(), control_bytes(0x80));
    }
}
