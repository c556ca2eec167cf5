//! SpecificConditionRecord

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::TimeReal;
use tacho_core::enums::SpecificConditionType;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

/// Begin or end of a specific condition (out of scope, ferry/train crossing)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecificConditionRecord {
    pub entry_time: Option<TimeReal>,
    pub specific_condition_type: SpecificConditionType,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl SpecificConditionRecord {
    pub const LENGTH: usize = 5;

    pub fn new(entry_time: Option<TimeReal>, specific_condition_type: SpecificConditionType) -> Self {
        Self {
            entry_time,
            specific_condition_type,
            raw_data: None,
        }
    }
}

impl Record for SpecificConditionRecord {
    const NAME: &'static str = "SpecificConditionRecord";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let entry_time = reader.read_time_real()?;
        let specific_condition_type = reader.read_enum()?;
        reader.finish()?;
        Ok(Self {
            entry_time,
            specific_condition_type,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_time_real(self.entry_time)?;
        canvas.paint_enum(&self.specific_condition_type)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::WireEnum;

    #[test]
    fn test_round_trip() {
        let data = [0x5F, 0xEE, 0x66, 0x00, 0x03];
        let record = SpecificConditionRecord::decode(&data, &Version::GEN1).unwrap();
        assert_eq!(record.specific_condition_type, SpecificConditionType::FerryTrainCrossingBegin);
        assert_eq!(record.encode(&Version::GEN1).unwrap(), data);
    }

    #[test]
    fn test_unrecognized_condition_is_kept() {
        let data = [0x5F, 0xEE, 0x66, 0x00, 0x7E];
        let mut record = SpecificConditionRecord::decode(&data, &Version::GEN2).unwrap();
        assert!(record.specific_condition_type.is_unrecognized());
        record.clear_raw_data();
        assert_eq!(record.encode(&Version::GEN2).unwrap(), data);
    }

    #[test]
    fn test_new_record() {
        let record = SpecificConditionRecord::new(
            Some(TimeReal::from_seconds(0x5FEE_6600)),
            SpecificConditionType::OutOfScopeEnd,
        );
        assert_eq!(record.encode(&Version::GEN1).unwrap(), vec![0x5F, 0xEE, 0x66, 0x00, 0x02]);
    }
}
