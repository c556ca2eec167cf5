//! Text fields
//!
//! - [`Ia5String`]: fixed-length ASCII text without a code page byte
//! - [`CodePageString`]: one code page selector byte followed by a
//!   fixed-length payload in that 8-bit character set
//!
//! Both keep the bytes they were decoded from. Encoding reuses those bytes
//! while they are present, so untouched text round-trips exactly even when
//! the decoded value was trimmed or repaired. Setting a new value drops
//! them.

use crate::enums::{CodePage, WireEnum};
use crate::error::{TachoError, TachoResult};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trailing padding bytes removed on decode
fn is_padding(byte: u8) -> bool {
    matches!(byte, 0x20 | 0x00 | 0xFF)
}

fn trim_padding(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|&b| !is_padding(b))
        .map(|i| i + 1)
        .unwrap_or(0);
    &data[..end]
}

fn pad_with_spaces(
    context: &'static str,
    mut bytes: Vec<u8>,
    length: usize,
) -> TachoResult<Vec<u8>> {
    if bytes.len() > length {
        return Err(TachoError::ValueTooLarge {
            context,
            message: format!("{} bytes of text exceed field width {}", bytes.len(), length),
        });
    }
    bytes.resize(length, b' ');
    Ok(bytes)
}

/// Fixed-length ASCII text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ia5String {
    value: String,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw: Option<Vec<u8>>,
}

impl Ia5String {
    /// Create from text, without original bytes
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw: None,
        }
    }

    /// Decode from exactly the field's bytes
    ///
    /// Trailing space, NUL and 0xFF bytes are trimmed; invalid sequences
    /// are replaced with U+FFFD.
    pub fn decode(data: &[u8]) -> Self {
        Self {
            value: String::from_utf8_lossy(trim_padding(data)).into_owned(),
            raw: Some(data.to_vec()),
        }
    }

    /// Encode into exactly `length` bytes
    ///
    /// Original bytes are reused when they are `length` long; otherwise the
    /// value is written and right-padded with spaces.
    ///
    /// # Errors
    /// [`TachoError::ValueTooLarge`] when the value is longer than `length`,
    /// [`TachoError::InvalidData`] when it is not ASCII.
    pub fn encode(&self, length: usize) -> TachoResult<Vec<u8>> {
        if let Some(raw) = &self.raw {
            if raw.len() == length {
                return Ok(raw.clone());
            }
        }
        if !self.value.is_ascii() {
            return Err(TachoError::InvalidData(format!(
                "IA5String: non-ASCII text {:?}",
                self.value
            )));
        }
        pad_with_spaces("IA5String", self.value.as_bytes().to_vec(), length)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text; original bytes are dropped
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.raw = None;
    }

    /// Bytes the value was decoded from, if kept
    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// Forget the original bytes
    pub fn clear_raw(&mut self) {
        self.raw = None;
    }
}

impl fmt::Display for Ia5String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Character set behind a code page selector
enum Charset {
    /// ISO/IEC 8859-1: byte value equals code point
    Latin1,
    Table(&'static Encoding),
    /// Code page 255: nothing assigned
    Unassigned,
}

fn charset(code_page: CodePage) -> Charset {
    match code_page {
        CodePage::Default | CodePage::Iso8859_1 | CodePage::Unspecified => Charset::Latin1,
        CodePage::Iso8859_2 => Charset::Table(encoding_rs::ISO_8859_2),
        CodePage::Iso8859_3 => Charset::Table(encoding_rs::ISO_8859_3),
        CodePage::Iso8859_4 => Charset::Table(encoding_rs::ISO_8859_4),
        CodePage::Iso8859_5 => Charset::Table(encoding_rs::ISO_8859_5),
        CodePage::Iso8859_6 => Charset::Table(encoding_rs::ISO_8859_6),
        CodePage::Iso8859_7 => Charset::Table(encoding_rs::ISO_8859_7),
        CodePage::Iso8859_8 => Charset::Table(encoding_rs::ISO_8859_8),
        // encoding_rs serves 8859-9 and 8859-11 through their Windows supersets
        CodePage::Iso8859_9 => Charset::Table(encoding_rs::WINDOWS_1254),
        CodePage::Iso8859_10 => Charset::Table(encoding_rs::ISO_8859_10),
        CodePage::Iso8859_11 => Charset::Table(encoding_rs::WINDOWS_874),
        CodePage::Iso8859_13 => Charset::Table(encoding_rs::ISO_8859_13),
        CodePage::Iso8859_14 => Charset::Table(encoding_rs::ISO_8859_14),
        CodePage::Iso8859_15 => Charset::Table(encoding_rs::ISO_8859_15),
        CodePage::Iso8859_16 => Charset::Table(encoding_rs::ISO_8859_16),
        CodePage::Koi8R => Charset::Table(encoding_rs::KOI8_R),
        CodePage::Koi8U => Charset::Table(encoding_rs::KOI8_U),
        CodePage::Empty => Charset::Unassigned,
        CodePage::Unrecognized(_) => Charset::Latin1,
    }
}

/// Decode payload bytes under a code page
pub fn decode_with_code_page(code_page: CodePage, data: &[u8]) -> String {
    let data = trim_padding(data);
    match charset(code_page) {
        Charset::Latin1 | Charset::Unassigned => data.iter().map(|&b| char::from(b)).collect(),
        Charset::Table(encoding) => encoding.decode_without_bom_handling(data).0.into_owned(),
    }
}

/// Encode text under a code page (without padding)
///
/// # Errors
/// [`TachoError::InvalidData`] when a character has no representation in
/// the code page, or when text is given for the unassigned code page.
pub fn encode_with_code_page(code_page: CodePage, text: &str) -> TachoResult<Vec<u8>> {
    match charset(code_page) {
        Charset::Latin1 => text
            .chars()
            .map(|c| {
                u8::try_from(u32::from(c)).map_err(|_| {
                    TachoError::InvalidData(format!(
                        "character {:?} not representable in ISO/IEC 8859-1",
                        c
                    ))
                })
            })
            .collect(),
        Charset::Table(encoding) => {
            let (bytes, _, unmappable) = encoding.encode(text);
            if unmappable {
                return Err(TachoError::InvalidData(format!(
                    "text {:?} not representable in {}",
                    text,
                    encoding.name()
                )));
            }
            Ok(bytes.into_owned())
        }
        Charset::Unassigned if text.is_empty() => Ok(Vec::new()),
        Charset::Unassigned => Err(TachoError::InvalidData(format!(
            "text {:?} given for unassigned code page",
            text
        ))),
    }
}

/// Code-paged text: selector byte plus fixed-length payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodePageString {
    code_page: CodePage,
    value: String,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw: Option<Vec<u8>>,
}

impl CodePageString {
    /// Create from text and code page, without original bytes
    pub fn new(code_page: CodePage, value: impl Into<String>) -> Self {
        Self {
            code_page,
            value: value.into(),
            raw: None,
        }
    }

    /// Decode selector and payload; `data` is the whole field
    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        crate::error::expect_at_least("CodePageString", data, 1)?;
        let code_page = CodePage::from_wire(data[0]);
        let payload = &data[1..];
        Ok(Self {
            code_page,
            value: decode_with_code_page(code_page, payload),
            raw: Some(payload.to_vec()),
        })
    }

    /// Encode into exactly `length` bytes (selector included)
    ///
    /// # Errors
    /// - [`TachoError::InvalidLength`] when kept payload bytes disagree with
    ///   the declared width
    /// - [`TachoError::ValueTooLarge`] when the text does not fit
    /// - [`TachoError::NoWireCode`] for an unspecified code page
    pub fn encode(&self, length: usize) -> TachoResult<Vec<u8>> {
        if length == 0 {
            return Err(TachoError::InvalidLength {
                context: "CodePageString",
                expected: 1,
                actual: 0,
            });
        }
        let payload_length = length - 1;
        let mut result = Vec::with_capacity(length);
        result.push(self.code_page.to_wire()?);
        match &self.raw {
            Some(raw) if raw.len() != payload_length => {
                return Err(TachoError::InvalidLength {
                    context: "CodePageString",
                    expected: payload_length,
                    actual: raw.len(),
                });
            }
            Some(raw) => result.extend_from_slice(raw),
            None => {
                let bytes = encode_with_code_page(self.code_page, &self.value)?;
                result.extend(pad_with_spaces("CodePageString", bytes, payload_length)?);
            }
        }
        Ok(result)
    }

    pub fn code_page(&self) -> CodePage {
        self.code_page
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace code page and text; original bytes are dropped
    pub fn set_value(&mut self, code_page: CodePage, value: impl Into<String>) {
        self.code_page = code_page;
        self.value = value.into();
        self.raw = None;
    }

    /// Payload bytes the value was decoded from, if kept
    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    pub fn clear_raw(&mut self) {
        self.raw = None;
    }
}

impl fmt::Display for CodePageString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ia5_decode_trims_padding() {
        let value = Ia5String::decode(b"AB12  \0\xFF");
        assert_eq!(value.value(), "AB12");
        assert_eq!(value.raw(), Some(&b"AB12  \0\xFF"[..]));
    }

    #[test]
    fn test_ia5_repairs_invalid_text() {
        let value = Ia5String::decode(&[0x41, 0xC3, 0x28, 0x42]);
        assert_eq!(value.value(), "A\u{FFFD}(B");
    }

    #[test]
    fn test_ia5_round_trip_uses_raw() {
        let data = b"XY\0\0 \xFF";
        let value = Ia5String::decode(data);
        assert_eq!(value.encode(6).unwrap(), data.to_vec());
    }

    #[test]
    fn test_ia5_encode_pads_and_rejects_overflow() {
        let value = Ia5String::new("DE");
        assert_eq!(value.encode(4).unwrap(), b"DE  ".to_vec());
        assert!(Ia5String::new("TOOLONG").encode(3).is_err());
        assert!(Ia5String::new("ÄB").encode(4).is_err());
    }

    #[test]
    fn test_ia5_set_value_drops_raw() {
        let mut value = Ia5String::decode(b"OLD ");
        value.set_value("NEW");
        assert_eq!(value.raw(), None);
        assert_eq!(value.encode(4).unwrap(), b"NEW ".to_vec());
    }

    #[test]
    fn test_code_page_latin1() {
        let data = [0x01, b'M', 0xFC, b'l', b'l', b'e', b'r', b' ', b' '];
        let value = CodePageString::decode(&data).unwrap();
        assert_eq!(value.code_page(), CodePage::Iso8859_1);
        assert_eq!(value.value(), "Müller");
        assert_eq!(value.encode(9).unwrap(), data.to_vec());
    }

    #[test]
    fn test_code_page_cyrillic() {
        // "ИВАН" in ISO/IEC 8859-5
        let data = [0x05, 0xB8, 0xB2, 0xB0, 0xBD, 0x20];
        let value = CodePageString::decode(&data).unwrap();
        assert_eq!(value.value(), "ИВАН");

        let fresh = CodePageString::new(CodePage::Iso8859_5, "ИВАН");
        assert_eq!(fresh.encode(6).unwrap(), data.to_vec());
    }

    #[test]
    fn test_code_page_unmappable() {
        let value = CodePageString::new(CodePage::Iso8859_5, "Ελλάδα");
        assert!(value.encode(20).is_err());
    }

    #[test]
    fn test_code_page_empty_and_unrecognized() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF];
        let value = CodePageString::decode(&data).unwrap();
        assert_eq!(value.code_page(), CodePage::Empty);
        assert_eq!(value.value(), "");
        assert_eq!(value.encode(4).unwrap(), data.to_vec());

        let data = [0x0C, b'A', b'B'];
        let value = CodePageString::decode(&data).unwrap();
        assert_eq!(value.code_page(), CodePage::Unrecognized(0x0C));
        assert_eq!(value.encode(3).unwrap(), data.to_vec());
    }

    #[test]
    fn test_code_page_raw_length_mismatch() {
        let value = CodePageString::decode(&[0x01, b'A', b'B', b'C']).unwrap();
        assert!(matches!(
            value.encode(3),
            Err(TachoError::InvalidLength { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_code_page_unspecified_fails() {
        let value = CodePageString::default();
        assert!(matches!(value.encode(4), Err(TachoError::NoWireCode { .. })));
    }
}
