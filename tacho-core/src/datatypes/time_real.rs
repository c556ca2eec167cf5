//! `TimeReal` timestamps and `Datef` dates
//!
//! `TimeReal` is 4 bytes big-endian, seconds since 1970-01-01 00:00 UTC.
//! The all-zero value means "no time": it decodes to `None`, and `None`
//! encodes back to four zero bytes.

use crate::datatypes::bcd::{decode_bcd, encode_bcd};
use crate::error::{expect_length, TachoError, TachoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeReal(u32);

impl TimeReal {
    pub const LENGTH: usize = 4;

    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Build from a UTC calendar date and time of day
    ///
    /// # Errors
    /// - [`TachoError::InvalidData`] for a month, day or time of day out of range
    /// - [`TachoError::ValueTooLarge`] when the instant falls outside
    ///   1970-01-01 00:00:00 ..= 2106-02-07 06:28:15
    pub fn from_civil(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> TachoResult<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 || minute > 59 || second > 59 {
            return Err(TachoError::InvalidData(format!(
                "TimeReal: invalid civil time {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            )));
        }
        let of_day = i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
        let seconds = days_from_civil(year, month, day)
            .checked_mul(86_400)
            .and_then(|s| s.checked_add(of_day));
        seconds
            .and_then(|s| u32::try_from(s).ok())
            .map(Self)
            .ok_or_else(|| TachoError::ValueTooLarge {
                context: "TimeReal",
                message: format!("{:04}-{:02}-{:02} is outside the 32-bit epoch range", year, month, day),
            })
    }

    /// Split into UTC `(year, month, day, hour, minute, second)`
    pub fn to_civil(&self) -> (i32, u32, u32, u32, u32, u32) {
        let seconds = i64::from(self.0);
        let (year, month, day) = civil_from_days(seconds.div_euclid(86_400));
        let of_day = seconds.rem_euclid(86_400) as u32;
        (year, month, day, of_day / 3600, (of_day % 3600) / 60, of_day % 60)
    }
}

impl fmt::Display for TimeReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day, hour, minute, second) = self.to_civil();
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            year, month, day, hour, minute, second
        )
    }
}

/// Decode a `TimeReal`; all-zero bytes are absent
pub fn decode_time_real(data: &[u8]) -> TachoResult<Option<TimeReal>> {
    expect_length("TimeReal", data, TimeReal::LENGTH)?;
    let seconds = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    Ok(if seconds == 0 {
        None
    } else {
        Some(TimeReal(seconds))
    })
}

/// Encode a `TimeReal`; absent encodes as four zero bytes
pub fn encode_time_real(value: Option<TimeReal>) -> [u8; 4] {
    value.map(|t| t.0).unwrap_or(0).to_be_bytes()
}

/// Calendar date, BCD `yyyy mm dd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Datef {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Datef {
    pub const LENGTH: usize = 4;

    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Decode a `Datef`; all-zero bytes are absent
    pub fn decode(data: &[u8]) -> TachoResult<Option<Self>> {
        expect_length("Datef", data, Self::LENGTH)?;
        if data.iter().all(|&b| b == 0) {
            return Ok(None);
        }
        Ok(Some(Self {
            year: decode_bcd(&data[0..2])? as u16,
            month: decode_bcd(&data[2..3])? as u8,
            day: decode_bcd(&data[3..4])? as u8,
        }))
    }

    /// Encode a `Datef`; absent encodes as four zero bytes
    pub fn encode(value: Option<&Self>) -> TachoResult<Vec<u8>> {
        let Some(date) = value else {
            return Ok(vec![0u8; Self::LENGTH]);
        };
        let mut result = encode_bcd(u64::from(date.year), 2)?;
        result.extend(encode_bcd(u64::from(date.month), 1)?);
        result.extend(encode_bcd(u64::from(date.day), 1)?);
        Ok(result)
    }

    /// Midnight UTC of this date as a `TimeReal`
    ///
    /// Compatibility shape for consumers that still expect a timestamp for
    /// date-only fields. Dates after 2106-02-07 fail with
    /// [`TachoError::ValueTooLarge`].
    pub fn to_time_real(&self) -> TachoResult<TimeReal> {
        TimeReal::from_civil(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
            0,
            0,
            0,
        )
    }
}

impl fmt::Display for Datef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let year = i64::from(year) - i64::from(month <= 2);
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let year_of_era = year - era * 400;
    let month = i64::from(month);
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}
