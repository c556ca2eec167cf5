//! CardEventRecord and CardFaultRecord
//!
//! Events and faults share one 24-byte layout; only the range of the type
//! code differs.

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::TimeReal;
use tacho_core::enums::EventFaultType;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

use crate::vehicle_registration::VehicleRegistrationIdentification;

/// Event or fault stored on a card
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardEventRecord {
    pub event_type: EventFaultType,
    pub begin_time: Option<TimeReal>,
    pub end_time: Option<TimeReal>,
    pub vehicle_registration: VehicleRegistrationIdentification,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

/// Fault records share the event layout
pub type CardFaultRecord = CardEventRecord;

impl CardEventRecord {
    pub const LENGTH: usize = 24;

    /// Unused slots of the cyclic files are all zero
    pub fn is_empty_slot(data: &[u8]) -> bool {
        data.iter().all(|&b| b == 0)
    }
}

impl Record for CardEventRecord {
    const NAME: &'static str = "CardEventRecord";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let event_type = reader.read_enum()?;
        let begin_time = reader.read_time_real()?;
        let end_time = reader.read_time_real()?;
        let vehicle_registration = VehicleRegistrationIdentification::decode(
            reader.read_bytes(VehicleRegistrationIdentification::LENGTH)?,
            version,
        )?;
        reader.finish()?;
        Ok(Self {
            event_type,
            begin_time,
            end_time,
            vehicle_registration,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_enum(&self.event_type)?;
        canvas.paint_time_real(self.begin_time)?;
        canvas.paint_time_real(self.end_time)?;
        canvas.paint(
            VehicleRegistrationIdentification::LENGTH,
            &self.vehicle_registration.encode(version)?,
        )?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.vehicle_registration.clear_raw_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::enums::{CodePage, NationNumeric};

    fn event_bytes() -> Vec<u8> {
        let mut data = vec![0x07];
        data.extend_from_slice(&[0x5F, 0xEE, 0x66, 0x00]);
        data.extend_from_slice(&[0x5F, 0xEE, 0x6D, 0x08]);
        data.extend_from_slice(&[0x0D, 0x01]);
        data.extend_from_slice(b"B-TC 1234    ");
        data
    }

    #[test]
    fn test_decode_event() {
        let record = CardEventRecord::decode(&event_bytes(), &Version::GEN1).unwrap();
        assert_eq!(record.event_type, EventFaultType::OverSpeeding);
        assert!(!record.event_type.is_fault());
        assert_eq!(record.begin_time, Some(TimeReal::from_civil(2021, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(record.end_time, Some(TimeReal::from_civil(2021, 1, 1, 0, 30, 0).unwrap()));
        assert_eq!(record.vehicle_registration.nation, NationNumeric::Germany);
        assert_eq!(record.encode(&Version::GEN1).unwrap(), event_bytes());
    }

    #[test]
    fn test_build_fault() {
        let fault = CardFaultRecord {
            event_type: EventFaultType::CardFaultNoFurtherDetails,
            begin_time: Some(TimeReal::from_civil(2021, 1, 1, 0, 0, 0).unwrap()),
            end_time: None,
            vehicle_registration: VehicleRegistrationIdentification::new(
                NationNumeric::Germany,
                CodePage::Iso8859_1,
                "B-TC 1234",
            ),
            ..Default::default()
        };
        let encoded = fault.encode(&Version::GEN2).unwrap();
        assert_eq!(encoded[0], 0x40);
        assert_eq!(&encoded[5..9], &[0, 0, 0, 0]);
        assert_eq!(CardFaultRecord::decode(&encoded, &Version::GEN2).unwrap().event_type, fault.event_type);
    }

    #[test]
    fn test_empty_slot() {
        assert!(CardEventRecord::is_empty_slot(&[0u8; 24]));
        assert!(!CardEventRecord::is_empty_slot(&event_bytes()));
    }
}
