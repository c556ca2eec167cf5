//! BER decoder for certificate bodies
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use tacho_asn1::ber::{BerDecoder, tags};
//!
//! # fn run(data: &[u8]) -> tacho_core::TachoResult<()> {
//! let mut decoder = BerDecoder::new(data);
//! let certificate = decoder.decode_tagged(tags::CV_CERTIFICATE)?;
//! let mut inner = BerDecoder::new(certificate.value);
//! let body = inner.decode_tagged(tags::CERTIFICATE_BODY)?;
//! // `body.raw` is the exact byte range the signature covers
//! # Ok(())
//! # }
//! ```

use crate::ber::types::{BerLength, BerTag, BerTagClass};
use crate::error::{TachoError, TachoResult};

/// One decoded TLV triplet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: BerTag,
    pub length: BerLength,
    /// Value bytes
    pub value: &'a [u8],
    /// Tag, length and value exactly as encoded
    pub raw: &'a [u8],
}

/// BER decoder over one buffer
///
/// The decoder keeps a position that advances as TLVs are read, so the
/// elements of a constructed value are decoded in order from one decoder.
/// Only definite lengths are accepted.
pub struct BerDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BerDecoder<'a> {
    /// Create a new BER decoder
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Check if there is more data to decode
    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    fn read_bytes(&mut self, count: usize) -> TachoResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(TachoError::MalformedAsn1(format!(
                "buffer exhausted: need {} bytes, have {}",
                count,
                self.remaining()
            )));
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..start + count])
    }

    /// Decode a TLV (Tag-Length-Value) triplet
    ///
    /// # Error Handling
    /// Returns [`TachoError::MalformedAsn1`] when the tag or length is
    /// malformed or the value runs past the end of the buffer. The position
    /// is left unchanged on error.
    pub fn decode_tlv(&mut self) -> TachoResult<Tlv<'a>> {
        let start = self.position;
        let result = self.decode_tlv_inner(start);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn decode_tlv_inner(&mut self, start: usize) -> TachoResult<Tlv<'a>> {
        let (tag, tag_bytes) = BerTag::decode(&self.buffer[self.position..])?;
        self.position += tag_bytes;

        let (length, length_bytes) = BerLength::decode(&self.buffer[self.position..])?;
        self.position += length_bytes;

        let value = self.read_bytes(length.value())?;
        Ok(Tlv {
            tag,
            length,
            value,
            raw: &self.buffer[start..self.position],
        })
    }

    /// Read the next tag without consuming anything
    pub fn peek_tag(&self) -> TachoResult<BerTag> {
        BerTag::decode(&self.buffer[self.position..]).map(|(tag, _)| tag)
    }

    /// Decode a TLV and check its tag
    ///
    /// # Error Handling
    /// Returns [`TachoError::MalformedAsn1`] naming both tags on mismatch.
    pub fn decode_tagged(&mut self, expected: BerTag) -> TachoResult<Tlv<'a>> {
        let tlv = self.decode_tlv()?;
        if tlv.tag != expected {
            return Err(TachoError::MalformedAsn1(format!(
                "expected tag {}, got {}",
                hex_tag(&expected),
                hex_tag(&tlv.tag)
            )));
        }
        Ok(tlv)
    }

    /// Decode an application tag
    ///
    /// # Arguments
    /// * `expected_tag_number` - Expected application tag number
    /// * `constructed` - Whether this is expected to be constructed
    ///
    /// # Returns
    /// Returns the decoded value bytes.
    pub fn decode_application(
        &mut self,
        expected_tag_number: u32,
        constructed: bool,
    ) -> TachoResult<&'a [u8]> {
        self.decode_tagged(BerTag::application(constructed, expected_tag_number))
            .map(|tlv| tlv.value)
    }

    /// Decode a context-specific tag, returning the value bytes
    pub fn decode_context_specific(
        &mut self,
        expected_tag_number: u32,
        constructed: bool,
    ) -> TachoResult<&'a [u8]> {
        self.decode_tagged(BerTag::context_specific(constructed, expected_tag_number))
            .map(|tlv| tlv.value)
    }

    /// Decode an OBJECT IDENTIFIER
    ///
    /// # Decoding Format
    /// - Tag: Universal, Primitive, tag 6
    /// - Value: first byte `40*X + Y`, then base-128 components
    pub fn decode_object_identifier(&mut self) -> TachoResult<Vec<u32>> {
        let tlv = self.decode_tagged(BerTag::universal(false, 6))?;
        decode_oid_value(tlv.value)
    }

    /// Skip a TLV, returning the number of bytes skipped
    pub fn skip_tlv(&mut self) -> TachoResult<usize> {
        self.decode_tlv().map(|tlv| tlv.raw.len())
    }

    /// Bytes not yet decoded
    pub fn rest(&self) -> &'a [u8] {
        &self.buffer[self.position..]
    }

    /// Fail unless the whole buffer was consumed
    pub fn finish(&self) -> TachoResult<()> {
        if self.has_remaining() {
            return Err(TachoError::MalformedAsn1(format!(
                "{} trailing bytes after last element",
                self.remaining()
            )));
        }
        Ok(())
    }
}

/// Decode the content octets of an OBJECT IDENTIFIER
pub fn decode_oid_value(value: &[u8]) -> TachoResult<Vec<u32>> {
    let Some(&first_byte) = value.first() else {
        return Err(TachoError::MalformedAsn1(
            "empty object identifier encoding".to_string(),
        ));
    };

    let (first, second) = match first_byte {
        0..=39 => (0, first_byte as u32),
        40..=79 => (1, (first_byte - 40) as u32),
        _ => (2, (first_byte - 80) as u32),
    };
    let mut oid = vec![first, second];

    let mut component = 0u32;
    let mut in_component = false;
    for &byte in &value[1..] {
        component = component
            .checked_mul(128)
            .and_then(|x| x.checked_add((byte & 0x7F) as u32))
            .ok_or_else(|| TachoError::MalformedAsn1("OID component overflow".to_string()))?;
        in_component = (byte & 0x80) != 0;
        if !in_component {
            oid.push(component);
            component = 0;
        }
    }

    if in_component {
        return Err(TachoError::MalformedAsn1(
            "unterminated OID component".to_string(),
        ));
    }

    Ok(oid)
}

/// Render OID components in dotted form
pub fn format_oid(oid: &[u32]) -> String {
    oid.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn hex_tag(tag: &BerTag) -> String {
    let bytes = tag.encode();
    let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    match tag.class() {
        BerTagClass::Universal => format!("{} (universal {})", hex, tag.number()),
        _ => hex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::encoder::BerEncoder;

    #[test]
    fn test_decode_tlv_raw_covers_header() {
        let data = [0x5F, 0x29, 0x01, 0x00, 0x42, 0x01, 0xAA];
        let mut decoder = BerDecoder::new(&data);
        let first = decoder.decode_tlv().unwrap();
        assert_eq!(first.tag, BerTag::application(false, 41));
        assert_eq!(first.value, &[0x00]);
        assert_eq!(first.raw, &data[..4]);
        let second = decoder.decode_tagged(BerTag::application(false, 2)).unwrap();
        assert_eq!(second.value, &[0xAA]);
        decoder.finish().unwrap();
    }

    #[test]
    fn test_decode_tagged_mismatch() {
        let data = [0x42, 0x01, 0xAA];
        let mut decoder = BerDecoder::new(&data);
        let err = decoder
            .decode_tagged(BerTag::application(false, 41))
            .unwrap_err();
        assert!(matches!(err, TachoError::MalformedAsn1(_)));
    }

    #[test]
    fn test_truncated_value_keeps_position() {
        let data = [0x42, 0x05, 0xAA];
        let mut decoder = BerDecoder::new(&data);
        assert!(decoder.decode_tlv().is_err());
        assert_eq!(decoder.position(), 0);
    }

    #[test]
    fn test_decode_object_identifier() {
        let mut encoder = BerEncoder::new();
        encoder
            .encode_object_identifier(&[1, 3, 36, 3, 3, 2, 8, 1, 1, 7])
            .unwrap();
        let encoded = encoder.into_bytes();
        assert_eq!(
            encoded,
            vec![0x06, 0x09, 0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07]
        );

        let mut decoder = BerDecoder::new(&encoded);
        let oid = decoder.decode_object_identifier().unwrap();
        assert_eq!(format_oid(&oid), "1.3.36.3.3.2.8.1.1.7");
    }

    #[test]
    fn test_decode_multibyte_oid_component() {
        // 1.2.840.10045.3.1.7
        let value = [0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07];
        assert_eq!(
            decode_oid_value(&value).unwrap(),
            vec![1, 2, 840, 10045, 3, 1, 7]
        );
        assert!(decode_oid_value(&[0x2A, 0x86]).is_err());
    }

    #[test]
    fn test_finish_detects_trailing_bytes() {
        let data = [0x42, 0x00, 0xFF];
        let mut decoder = BerDecoder::new(&data);
        decoder.skip_tlv().unwrap();
        assert!(decoder.finish().is_err());
        assert_eq!(decoder.rest(), &[0xFF]);
    }
}
