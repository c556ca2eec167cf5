//! Driver activity file
//!
//! Two pointers followed by a cyclic byte buffer of variable-length daily
//! records. Each record starts with its own length and the length of the
//! record before it; the walk starts at the oldest pointer and ends with
//! the record at the newest pointer, wrapping at the end of the buffer.

use serde::{Deserialize, Serialize};
use tacho_core::error::{expect_at_least, TachoError, TachoResult};
use tacho_records::CardActivityDailyRecord;

/// Daily record found in the cyclic buffer, with its offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub offset: usize,
    pub record: CardActivityDailyRecord,
}

/// Decoded driver activity file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverActivityData {
    pub oldest_day_record_pointer: u16,
    pub newest_day_record_pointer: u16,
    pub days: Vec<ActivityDay>,
    #[serde(with = "serde_bytes")]
    cyclic_buffer: Vec<u8>,
}

impl DriverActivityData {
    pub const NAME: &'static str = "DriverActivityData";
    pub const POINTERS_LENGTH: usize = 4;

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_at_least(Self::NAME, data, Self::POINTERS_LENGTH)?;
        let oldest_day_record_pointer = u16::from_be_bytes([data[0], data[1]]);
        let newest_day_record_pointer = u16::from_be_bytes([data[2], data[3]]);
        let cyclic_buffer = data[Self::POINTERS_LENGTH..].to_vec();
        let days = walk(&cyclic_buffer, oldest_day_record_pointer, newest_day_record_pointer)?;
        Ok(Self {
            oldest_day_record_pointer,
            newest_day_record_pointer,
            days,
            cyclic_buffer,
        })
    }

    /// Re-encode, painting each day back at its offset
    ///
    /// # Errors
    /// [`TachoError::InvalidLength`] when a day no longer has the length of
    /// the record it was read from.
    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let mut buffer = self.cyclic_buffer.clone();
        for day in &self.days {
            let bytes = day.record.encode()?;
            let header = read_cyclic(&buffer, day.offset, 4)?;
            let (_, original_length) = CardActivityDailyRecord::peek_lengths(&header)?;
            if bytes.len() != usize::from(original_length) {
                return Err(TachoError::InvalidLength {
                    context: CardActivityDailyRecord::NAME,
                    expected: usize::from(original_length),
                    actual: bytes.len(),
                });
            }
            write_cyclic(&mut buffer, day.offset, &bytes)?;
        }
        let mut result = Vec::with_capacity(Self::POINTERS_LENGTH + buffer.len());
        result.extend_from_slice(&self.oldest_day_record_pointer.to_be_bytes());
        result.extend_from_slice(&self.newest_day_record_pointer.to_be_bytes());
        result.extend(buffer);
        Ok(result)
    }

    /// The ring buffer as read
    pub fn cyclic_buffer(&self) -> &[u8] {
        &self.cyclic_buffer
    }
}

fn read_cyclic(buffer: &[u8], offset: usize, length: usize) -> TachoResult<Vec<u8>> {
    if length > buffer.len() || offset >= buffer.len() {
        return Err(TachoError::InvalidData(format!(
            "activity record of {} bytes at offset {} does not fit a {}-byte buffer",
            length,
            offset,
            buffer.len()
        )));
    }
    Ok((0..length).map(|i| buffer[(offset + i) % buffer.len()]).collect())
}

fn write_cyclic(buffer: &mut [u8], offset: usize, bytes: &[u8]) -> TachoResult<()> {
    if bytes.len() > buffer.len() || offset >= buffer.len() {
        return Err(TachoError::InvalidData(format!(
            "activity record of {} bytes at offset {} does not fit a {}-byte buffer",
            bytes.len(),
            offset,
            buffer.len()
        )));
    }
    let size = buffer.len();
    for (i, byte) in bytes.iter().enumerate() {
        buffer[(offset + i) % size] = *byte;
    }
    Ok(())
}

fn walk(buffer: &[u8], oldest: u16, newest: u16) -> TachoResult<Vec<ActivityDay>> {
    let mut days = Vec::new();
    if buffer.is_empty() {
        return Ok(days);
    }
    let (oldest, newest) = (usize::from(oldest), usize::from(newest));
    if oldest >= buffer.len() || newest >= buffer.len() {
        return Err(TachoError::InvalidData(format!(
            "activity pointers {}/{} outside a {}-byte buffer",
            oldest,
            newest,
            buffer.len()
        )));
    }
    let mut offset = oldest;
    // every record is at least a header long, which bounds the walk
    let limit = buffer.len() / CardActivityDailyRecord::HEADER_LENGTH + 1;
    for _ in 0..limit {
        let header = read_cyclic(buffer, offset, 4)?;
        let (_, length) = CardActivityDailyRecord::peek_lengths(&header)?;
        let length = usize::from(length);
        if length == 0 {
            // never written
            return Ok(days);
        }
        if length < CardActivityDailyRecord::HEADER_LENGTH {
            return Err(TachoError::InvalidLength {
                context: CardActivityDailyRecord::NAME,
                expected: CardActivityDailyRecord::HEADER_LENGTH,
                actual: length,
            });
        }
        let record = CardActivityDailyRecord::decode(&read_cyclic(buffer, offset, length)?)?;
        days.push(ActivityDay { offset, record });
        if offset == newest {
            return Ok(days);
        }
        offset = (offset + length) % buffer.len();
    }
    Err(TachoError::InvalidData(format!(
        "activity walk from {} never reached newest record at {}",
        oldest, newest
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(previous: u16, date: u32, changes: &[u16]) -> Vec<u8> {
        let length = 12 + 2 * changes.len() as u16;
        let mut data = Vec::new();
        data.extend_from_slice(&previous.to_be_bytes());
        data.extend_from_slice(&length.to_be_bytes());
        data.extend_from_slice(&date.to_be_bytes());
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x64]);
        for change in changes {
            data.extend_from_slice(&change.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_walk_linear() {
        let first = day(0, 0x5FEE_6600, &[0x0000, 0x19E0]);
        let second = day(16, 0x5FEF_B780, &[0x0000]);
        let mut buffer = first.clone();
        buffer.extend(&second);
        buffer.extend(vec![0u8; 10]);
        let mut data = vec![0x00, 0x00, 0x00, 0x10];
        data.extend(&buffer);

        let activity = DriverActivityData::decode(&data).unwrap();
        assert_eq!(activity.days.len(), 2);
        assert_eq!(activity.days[1].offset, 16);
        assert_eq!(activity.days[1].record.previous_record_length, 16);
        assert_eq!(activity.encode().unwrap(), data);
    }

    #[test]
    fn test_walk_wraps_around() {
        let first = day(0, 0x5FEE_6600, &[0x0000, 0x19E0]);
        let second = day(16, 0x5FEF_B780, &[0x0000, 0x1000]);
        // 36-byte ring: first at 26 (wrapping after 10 bytes), second at 6
        let mut buffer = vec![0u8; 36];
        for (i, byte) in first.iter().enumerate() {
            buffer[(26 + i) % 36] = *byte;
        }
        for (i, byte) in second.iter().enumerate() {
            buffer[6 + i] = *byte;
        }
        let mut data = vec![0x00, 26, 0x00, 6];
        data.extend(&buffer);

        let activity = DriverActivityData::decode(&data).unwrap();
        assert_eq!(activity.days.len(), 2);
        assert_eq!(activity.days[0].offset, 26);
        assert_eq!(activity.days[0].record.activity_change_info.len(), 2);
        assert_eq!(activity.days[1].offset, 6);
        assert_eq!(activity.encode().unwrap(), data);
    }

    #[test]
    fn test_modified_day_is_painted_back() {
        let first = day(0, 0x5FEE_6600, &[0x0000, 0x19E0]);
        let mut data = vec![0x00, 0x00, 0x00, 0x00];
        data.extend(&first);
        data.extend(vec![0u8; 8]);
        let mut activity = DriverActivityData::decode(&data).unwrap();
        activity.days[0].record.day_distance = 250;
        let encoded = activity.encode().unwrap();
        assert_eq!(&encoded[14..16], &[0x00, 0xFA]);
        assert_eq!(&encoded[..14], &data[..14]);
        assert_eq!(&encoded[16..], &data[16..]);

        activity.days[0].record.activity_change_info.pop();
        assert!(matches!(activity.encode(), Err(TachoError::InvalidLength { .. })));
    }

    #[test]
    fn test_empty_buffer() {
        let mut data = vec![0u8; 4];
        data.extend(vec![0u8; 40]);
        let activity = DriverActivityData::decode(&data).unwrap();
        assert!(activity.days.is_empty());
        assert_eq!(activity.encode().unwrap(), data);
    }

    #[test]
    fn test_pointer_outside_buffer() {
        let mut data = vec![0x00, 0x50, 0x00, 0x00];
        data.extend(vec![0u8; 40]);
        assert!(matches!(DriverActivityData::decode(&data), Err(TachoError::InvalidData(_))));
    }

    #[test]
    fn test_walk_that_never_reaches_newest() {
        let first = day(0, 0x5FEE_6600, &[]);
        let mut buffer = first.clone();
        buffer.extend(first.clone());
        // newest points into the middle of a record
        let mut data = vec![0x00, 0x00, 0x00, 0x05];
        data.extend(&buffer);
        assert!(DriverActivityData::decode(&data).is_err());
    }
}
