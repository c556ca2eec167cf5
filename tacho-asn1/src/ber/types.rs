//! Tag and length octets of card-verifiable certificates
//!
//! Generation 2 certificates nest application-class TLVs, most with
//! two-octet tags: `7F21` certificate, `7F4E` body, `7F49` public key,
//! `5F20` holder reference, `5F37` signature. Lengths remember the form
//! they were read in, because the signature covers the body exactly as
//! it was encoded.

use crate::error::{TachoError, TachoResult};

/// Class bits (8 and 7) of the first identifier octet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// `06` curve OID, `30` domain parameter sequence
    Universal = 0,
    /// Every certificate element
    Application = 1,
    /// `86` public point inside `7F49`
    ContextSpecific = 2,
    Private = 3,
}

impl BerTagClass {
    pub fn from_bits(octet: u8) -> Self {
        match octet >> 6 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// Identifier octets of a TLV
///
/// Numbers up to 30 fit in the first octet. Larger numbers set its low
/// five bits and follow in base-128 groups, high group first, with bit 8
/// set on every group but the last: application 55 is `5F 37`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

/// Most base-128 groups accepted after the first identifier octet
const MAX_TAG_GROUPS: usize = 4;

impl BerTag {
    pub const fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    pub const fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    pub const fn application(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Application, constructed, number)
    }

    pub const fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    pub fn class(&self) -> BerTagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn encode(&self) -> Vec<u8> {
        let leading = self.class.to_bits() | if self.constructed { 0x20 } else { 0x00 };
        if self.number <= 30 {
            return vec![leading | self.number as u8];
        }
        let mut groups = Vec::new();
        let mut rest = self.number;
        while rest > 0 {
            groups.push((rest & 0x7F) as u8);
            rest >>= 7;
        }
        let mut result = vec![leading | 0x1F];
        let last = groups.len() - 1;
        result.extend(
            groups
                .iter()
                .rev()
                .enumerate()
                .map(|(i, &group)| if i < last { group | 0x80 } else { group }),
        );
        result
    }

    /// Read the identifier octets at the start of `data`
    ///
    /// Returns the tag and the number of octets it took.
    ///
    /// # Error Handling
    /// [`TachoError::MalformedAsn1`] for an empty buffer, or a multi-octet
    /// number that is unterminated or longer than four groups.
    pub fn decode(data: &[u8]) -> TachoResult<(Self, usize)> {
        let Some(&first) = data.first() else {
            return Err(TachoError::MalformedAsn1("no identifier octet".to_string()));
        };
        let class = BerTagClass::from_bits(first);
        let constructed = first & 0x20 != 0;
        if first & 0x1F != 0x1F {
            return Ok((Self::new(class, constructed, u32::from(first & 0x1F)), 1));
        }

        let mut number = 0u32;
        for (i, &octet) in data[1..].iter().enumerate() {
            if i == MAX_TAG_GROUPS {
                return Err(TachoError::MalformedAsn1(format!(
                    "tag {:02X}: number longer than {} octets",
                    first, MAX_TAG_GROUPS
                )));
            }
            number = (number << 7) | u32::from(octet & 0x7F);
            if octet & 0x80 == 0 {
                return Ok((Self::new(class, constructed, number), i + 2));
            }
        }
        Err(TachoError::MalformedAsn1(format!(
            "tag {:02X}: unterminated tag number",
            first
        )))
    }
}

/// Length octets of a TLV, in the form they were written
///
/// `81 7F` decodes to `Long(127)` and re-encodes as the same two octets
/// instead of the minimal `7F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// One octet, 0..=127
    Short(u8),
    /// `0x80 | n` followed by `n` big-endian octets
    Long(usize),
}

/// Most length octets accepted after `0x80 | n`
const MAX_LENGTH_OCTETS: usize = 4;

impl BerLength {
    /// Minimal form for `length`
    pub fn new(length: usize) -> Self {
        match u8::try_from(length) {
            Ok(short) if short < 0x80 => BerLength::Short(short),
            _ => BerLength::Long(length),
        }
    }

    pub fn value(&self) -> usize {
        match *self {
            BerLength::Short(length) => usize::from(length),
            BerLength::Long(length) => length,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match *self {
            BerLength::Short(length) => vec![length],
            BerLength::Long(length) => {
                let octets = length.to_be_bytes();
                let skip = octets
                    .iter()
                    .position(|&b| b != 0)
                    .unwrap_or(octets.len() - 1);
                let mut result = vec![0x80 | (octets.len() - skip) as u8];
                result.extend_from_slice(&octets[skip..]);
                result
            }
        }
    }

    /// Read the length octets at the start of `data`
    ///
    /// Returns the length and the number of octets it took.
    ///
    /// # Error Handling
    /// [`TachoError::MalformedAsn1`] for an empty or short buffer, the
    /// indefinite form `80`, or more than four length octets.
    pub fn decode(data: &[u8]) -> TachoResult<(Self, usize)> {
        let Some(&first) = data.first() else {
            return Err(TachoError::MalformedAsn1("no length octet".to_string()));
        };
        if first & 0x80 == 0 {
            return Ok((BerLength::Short(first), 1));
        }
        let count = usize::from(first & 0x7F);
        if count == 0 {
            return Err(TachoError::MalformedAsn1(
                "indefinite length in a certificate".to_string(),
            ));
        }
        if count > MAX_LENGTH_OCTETS {
            return Err(TachoError::MalformedAsn1(format!(
                "{} length octets, at most {}",
                count, MAX_LENGTH_OCTETS
            )));
        }
        let Some(octets) = data.get(1..=count) else {
            return Err(TachoError::MalformedAsn1(format!(
                "length declares {} octets, {} left",
                count,
                data.len() - 1
            )));
        };
        let length = octets
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
        Ok((BerLength::Long(length), 1 + count))
    }
}
