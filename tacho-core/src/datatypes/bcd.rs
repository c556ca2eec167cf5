//! Binary-coded decimal integers
//!
//! Each nibble holds one decimal digit, most significant digit first.
//! Decoding is all-or-nothing: one nibble in `A`..=`F` rejects the whole
//! value.

use crate::error::{TachoError, TachoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most digits a `u64` can always hold
const MAX_DIGITS: usize = 19;

/// Decode a BCD byte string into an integer
///
/// # Errors
/// - [`TachoError::InvalidBcd`] when any nibble is not a decimal digit
/// - [`TachoError::ValueTooLarge`] when the digits do not fit in a `u64`
pub fn decode_bcd(data: &[u8]) -> TachoResult<u64> {
    if data.len() * 2 > MAX_DIGITS + 1 {
        return Err(TachoError::ValueTooLarge {
            context: "BCD",
            message: format!("{} bytes of BCD do not fit in 64 bits", data.len()),
        });
    }
    let mut value: u64 = 0;
    for &byte in data {
        let high = byte >> 4;
        let low = byte & 0x0F;
        if high > 9 || low > 9 {
            return Err(TachoError::InvalidBcd {
                context: "BCD",
                byte,
            });
        }
        value = value
            .checked_mul(100)
            .and_then(|v| v.checked_add(u64::from(high) * 10 + u64::from(low)))
            .ok_or_else(|| TachoError::ValueTooLarge {
                context: "BCD",
                message: "BCD value overflows 64 bits".to_string(),
            })?;
    }
    Ok(value)
}

/// Number of decimal digits of `value`; zero counts as one digit
pub fn bcd_digit_count(value: u64) -> usize {
    let mut digits = 1;
    let mut rest = value / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Encode `value` as BCD into exactly `length` bytes, zero-padded on the left
///
/// # Errors
/// [`TachoError::ValueTooLarge`] when `value` needs more than `2 * length`
/// digits.
pub fn encode_bcd(value: u64, length: usize) -> TachoResult<Vec<u8>> {
    let digits = bcd_digit_count(value);
    if digits > length * 2 {
        return Err(TachoError::ValueTooLarge {
            context: "BCD",
            message: format!(
                "{} needs {} digits, only {} available in {} bytes",
                value,
                digits,
                length * 2,
                length
            ),
        });
    }
    let mut result = vec![0u8; length];
    let mut rest = value;
    for byte in result.iter_mut().rev() {
        let low = (rest % 10) as u8;
        rest /= 10;
        let high = (rest % 10) as u8;
        rest /= 10;
        *byte = (high << 4) | low;
    }
    Ok(result)
}

/// Encode `value` in the fewest whole bytes
pub fn encode_bcd_minimal(value: u64) -> Vec<u8> {
    let length = bcd_digit_count(value).div_ceil(2);
    // length always holds the digit count
    encode_bcd(value, length).unwrap_or_default()
}

/// Month and two-digit year, BCD `mm yy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MonthYear {
    pub month: u8,
    pub year: u8,
}

impl MonthYear {
    pub const LENGTH: usize = 2;

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        crate::error::expect_length("MonthYear", data, Self::LENGTH)?;
        Ok(Self {
            month: decode_bcd(&data[0..1])? as u8,
            year: decode_bcd(&data[1..2])? as u8,
        })
    }

    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let mut result = encode_bcd(u64::from(self.month), 1)?;
        result.extend(encode_bcd(u64::from(self.year), 1)?);
        Ok(result)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year)
    }
}
