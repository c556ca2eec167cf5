//! CardActivityDailyRecord
//!
//! Variable length: a 12-byte header followed by one [`ActivityChangeInfo`]
//! per change. The header's own length field must agree with the bytes
//! handed to `decode`; the encoder recomputes it from the change list.

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{decode_bcd, encode_bcd, TimeReal};
use tacho_core::error::expect_at_least;
use tacho_core::{Canvas, Record, RecordReader, TachoError, TachoResult, Version};

use crate::activity_change_info::ActivityChangeInfo;

/// Activities of one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardActivityDailyRecord {
    /// Length of the preceding daily record, 0 for the first one
    pub previous_record_length: u16,
    pub record_date: Option<TimeReal>,
    /// Days this card was used; 4 BCD digits
    pub daily_presence_counter: u16,
    /// Distance travelled on this day, km
    pub day_distance: u16,
    pub activity_change_info: Vec<ActivityChangeInfo>,
}

impl CardActivityDailyRecord {
    pub const NAME: &'static str = "CardActivityDailyRecord";
    pub const HEADER_LENGTH: usize = 12;

    /// Previous-record and record lengths from the first four header bytes
    pub fn peek_lengths(header: &[u8]) -> TachoResult<(u16, u16)> {
        expect_at_least(Self::NAME, header, 4)?;
        Ok((
            u16::from_be_bytes([header[0], header[1]]),
            u16::from_be_bytes([header[2], header[3]]),
        ))
    }

    /// Length on the wire, header included
    pub fn record_length(&self) -> usize {
        Self::HEADER_LENGTH + self.activity_change_info.len() * ActivityChangeInfo::LENGTH
    }

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_at_least(Self::NAME, data, Self::HEADER_LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let previous_record_length = reader.read_u16()?;
        let record_length = usize::from(reader.read_u16()?);
        if record_length != data.len() {
            return Err(TachoError::InvalidLength {
                context: Self::NAME,
                expected: record_length,
                actual: data.len(),
            });
        }
        if (record_length - Self::HEADER_LENGTH) % ActivityChangeInfo::LENGTH != 0 {
            return Err(TachoError::InvalidLength {
                context: Self::NAME,
                expected: record_length - 1,
                actual: record_length,
            });
        }
        let record_date = reader.read_time_real()?;
        let daily_presence_counter = decode_bcd(reader.read_bytes(2)?)? as u16;
        let day_distance = reader.read_u16()?;
        let activity_change_info = ActivityChangeInfo::decode_many(reader.read_rest(), &Version::default())?;
        Ok(Self {
            previous_record_length,
            record_date,
            daily_presence_counter,
            day_distance,
            activity_change_info,
        })
    }

    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let length = self.record_length();
        let wire_length = u16::try_from(length).map_err(|_| TachoError::ValueTooLarge {
            context: Self::NAME,
            message: format!("{} activity changes do not fit", self.activity_change_info.len()),
        })?;
        let mut canvas = Canvas::zeroed(Self::NAME, length);
        canvas.paint_u16(self.previous_record_length)?;
        canvas.paint_u16(wire_length)?;
        canvas.paint_time_real(self.record_date)?;
        canvas.paint(2, &encode_bcd(u64::from(self.daily_presence_counter), 2)?)?;
        canvas.paint_u16(self.day_distance)?;
        for info in &self.activity_change_info {
            canvas.paint_u16(info.to_u16()?)?;
        }
        canvas.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity_change_info::DriverActivity;

    fn day_bytes() -> Vec<u8> {
        vec![
            0x00, 0x10, // previous length 16
            0x00, 0x12, // length 18
            0x5F, 0xEE, 0x66, 0x00, // 2021-01-01
            0x01, 0x23, // presence counter 123
            0x01, 0x2C, // 300 km
            0x00, 0x00, // 00:00 break
            0x19, 0xE0, // 08:00 driving
            0x08, 0x5A, // 01:30 availability
        ]
    }

    #[test]
    fn test_decode_day() {
        let day = CardActivityDailyRecord::decode(&day_bytes()).unwrap();
        assert_eq!(day.previous_record_length, 16);
        assert_eq!(day.record_date, Some(TimeReal::from_civil(2021, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(day.daily_presence_counter, 123);
        assert_eq!(day.day_distance, 300);
        assert_eq!(day.activity_change_info.len(), 3);
        assert_eq!(day.activity_change_info[1].activity, DriverActivity::Driving);
        assert_eq!(day.activity_change_info[1].time_of_change, 480);
        assert_eq!(day.record_length(), 18);
        assert_eq!(day.encode().unwrap(), day_bytes());
    }

    #[test]
    fn test_length_field_must_match() {
        let mut data = day_bytes();
        data.truncate(16);
        assert!(matches!(
            CardActivityDailyRecord::decode(&data),
            Err(TachoError::InvalidLength {
                expected: 18,
                actual: 16,
                ..
            })
        ));
    }

    #[test]
    fn test_odd_change_area_is_rejected() {
        let mut data = day_bytes();
        data.truncate(17);
        data[3] = 17;
        assert!(CardActivityDailyRecord::decode(&data).is_err());
    }

    #[test]
    fn test_encode_recomputes_length() {
        let mut day = CardActivityDailyRecord::decode(&day_bytes()).unwrap();
        day.activity_change_info.pop();
        let encoded = day.encode().unwrap();
        assert_eq!(CardActivityDailyRecord::peek_lengths(&encoded).unwrap(), (16, 16));
    }

    #[test]
    fn test_header_only_day() {
        let mut data = day_bytes();
        data.truncate(12);
        data[3] = 12;
        let day = CardActivityDailyRecord::decode(&data).unwrap();
        assert!(day.activity_change_info.is_empty());
    }
}
