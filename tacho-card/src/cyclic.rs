//! Cyclic record files
//!
//! Files such as places or vehicles used are ring buffers of fixed-size
//! records, optionally preceded by a pointer to the newest record. The
//! record count follows from the file length and must divide it exactly.

use serde::{Deserialize, Serialize};
use tacho_core::error::{expect_at_least, TachoError, TachoResult};
use tacho_core::{Record, Version};

/// Width of the newest-record pointer in front of the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerWidth {
    None,
    One,
    Two,
}

impl PointerWidth {
    pub fn len(self) -> usize {
        match self {
            PointerWidth::None => 0,
            PointerWidth::One => 1,
            PointerWidth::Two => 2,
        }
    }

    pub fn is_empty(self) -> bool {
        self == PointerWidth::None
    }
}

/// Pointer plus records of one cyclic file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclicRecords<R> {
    /// Index of the newest record; absent for files without a pointer
    pub newest_record_pointer: Option<u16>,
    pub records: Vec<R>,
}

impl<R: Record> CyclicRecords<R> {
    pub fn new(newest_record_pointer: Option<u16>, records: Vec<R>) -> Self {
        Self {
            newest_record_pointer,
            records,
        }
    }

    pub fn decode(data: &[u8], pointer: PointerWidth, version: &Version) -> TachoResult<Self> {
        expect_at_least(R::NAME, data, pointer.len())?;
        let newest_record_pointer = match pointer {
            PointerWidth::None => None,
            PointerWidth::One => Some(u16::from(data[0])),
            PointerWidth::Two => Some(u16::from_be_bytes([data[0], data[1]])),
        };
        let records = R::decode_many(&data[pointer.len()..], version)?;
        Ok(Self {
            newest_record_pointer,
            records,
        })
    }

    pub fn encode(&self, pointer: PointerWidth, version: &Version) -> TachoResult<Vec<u8>> {
        let mut result = Vec::with_capacity(pointer.len() + self.records.len() * R::size(version));
        let value = self.newest_record_pointer.unwrap_or(0);
        match pointer {
            PointerWidth::None => {}
            PointerWidth::One => {
                let byte = u8::try_from(value).map_err(|_| TachoError::ValueTooLarge {
                    context: R::NAME,
                    message: format!("newest record pointer {} exceeds one byte", value),
                })?;
                result.push(byte);
            }
            PointerWidth::Two => result.extend_from_slice(&value.to_be_bytes()),
        }
        for record in &self.records {
            result.extend(record.encode(version)?);
        }
        Ok(result)
    }

    /// The record the pointer designates
    pub fn newest(&self) -> Option<&R> {
        self.newest_record_pointer
            .and_then(|pointer| self.records.get(usize::from(pointer)))
    }

    /// Records oldest first: those after the pointer, then up to it
    pub fn chronological(&self) -> impl Iterator<Item = &R> {
        let split = match self.newest_record_pointer {
            Some(pointer) if usize::from(pointer) < self.records.len() => usize::from(pointer) + 1,
            _ => 0,
        };
        self.records[split..].iter().chain(self.records[..split].iter())
    }

    pub fn clear_raw_data(&mut self) {
        for record in &mut self.records {
            record.clear_raw_data();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_records::SpecificConditionRecord;

    fn condition(seconds: u32, kind: u8) -> Vec<u8> {
        let mut data = seconds.to_be_bytes().to_vec();
        data.push(kind);
        data
    }

    #[test]
    fn test_pointer_and_records() {
        let mut data = vec![0x00, 0x01];
        data.extend(condition(200, 1));
        data.extend(condition(300, 2));
        data.extend(condition(100, 4));
        let file = CyclicRecords::<SpecificConditionRecord>::decode(&data, PointerWidth::Two, &Version::GEN2).unwrap();
        assert_eq!(file.newest_record_pointer, Some(1));
        assert_eq!(file.records.len(), 3);
        assert_eq!(file.newest().and_then(|r| r.entry_time).map(|t| t.seconds()), Some(300));
        let order: Vec<u32> = file
            .chronological()
            .filter_map(|r| r.entry_time.map(|t| t.seconds()))
            .collect();
        assert_eq!(order, vec![100, 200, 300]);
        assert_eq!(file.encode(PointerWidth::Two, &Version::GEN2).unwrap(), data);
    }

    #[test]
    fn test_without_pointer() {
        let data = [condition(1, 1), condition(2, 2)].concat();
        let file = CyclicRecords::<SpecificConditionRecord>::decode(&data, PointerWidth::None, &Version::GEN1).unwrap();
        assert_eq!(file.newest_record_pointer, None);
        assert_eq!(file.chronological().count(), 2);
        assert_eq!(file.encode(PointerWidth::None, &Version::GEN1).unwrap(), data);
    }

    #[test]
    fn test_count_must_divide() {
        let mut data = vec![0x00];
        data.extend(condition(1, 1));
        data.push(0xFF);
        assert!(matches!(
            CyclicRecords::<SpecificConditionRecord>::decode(&data, PointerWidth::One, &Version::GEN1),
            Err(TachoError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_one_byte_pointer_overflow() {
        let file = CyclicRecords::<SpecificConditionRecord>::new(Some(300), Vec::new());
        assert!(file.encode(PointerWidth::One, &Version::GEN1).is_err());
        assert_eq!(file.encode(PointerWidth::Two, &Version::GEN2).unwrap(), vec![0x01, 0x2C]);
    }
}
