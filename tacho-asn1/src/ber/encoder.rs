//! BER encoder
//!
//! Builds definite-length TLVs in minimal length form. Certificates that
//! were decoded keep their own bytes; this encoder is for building new
//! bodies.

use crate::ber::types::{BerLength, BerTag};
use crate::error::{TachoError, TachoResult};

/// BER encoder accumulating TLVs into one buffer
#[derive(Debug, Default)]
pub struct BerEncoder {
    buffer: Vec<u8>,
}

impl BerEncoder {
    /// Create a new BER encoder
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Encode a TLV (Tag-Length-Value) triplet
    ///
    /// # Arguments
    /// * `tag` - BER tag
    /// * `value` - Value bytes (already encoded)
    pub fn encode_tlv(&mut self, tag: &BerTag, value: &[u8]) -> TachoResult<()> {
        self.buffer.extend_from_slice(&tag.encode());
        self.buffer
            .extend_from_slice(&BerLength::new(value.len()).encode());
        self.buffer.extend_from_slice(value);
        Ok(())
    }

    /// Encode an OCTET STRING
    pub fn encode_octet_string(&mut self, value: &[u8]) -> TachoResult<()> {
        self.encode_tlv(&BerTag::universal(false, 4), value)
    }

    /// Encode an OBJECT IDENTIFIER
    ///
    /// # Arguments
    /// * `oid` - Object identifier components (e.g., `[1, 3, 132, 0, 34]` for P-384)
    ///
    /// # Encoding Format
    /// - First two components (X.Y) are encoded as `40*X + Y`
    /// - Remaining components in base-128, bit 7 set on all but the last byte
    pub fn encode_object_identifier(&mut self, oid: &[u32]) -> TachoResult<()> {
        if oid.len() < 2 {
            return Err(TachoError::MalformedAsn1(
                "object identifier must have at least 2 components".to_string(),
            ));
        }
        if oid[0] > 2 || (oid[0] < 2 && oid[1] > 39) {
            return Err(TachoError::MalformedAsn1(format!(
                "invalid OID arc {}.{}",
                oid[0], oid[1]
            )));
        }

        let first = 40u32
            .checked_mul(oid[0])
            .and_then(|x| x.checked_add(oid[1]))
            .filter(|x| *x <= 0xFF)
            .ok_or_else(|| TachoError::MalformedAsn1("OID component too large".to_string()))?;

        let mut bytes = vec![first as u8];
        for &component in &oid[2..] {
            let mut temp = component;
            let mut component_bytes = Vec::new();
            loop {
                component_bytes.push((temp & 0x7F) as u8);
                temp >>= 7;
                if temp == 0 {
                    break;
                }
            }
            for (i, &byte) in component_bytes.iter().rev().enumerate() {
                if i < component_bytes.len() - 1 {
                    bytes.push(byte | 0x80);
                } else {
                    bytes.push(byte);
                }
            }
        }

        self.encode_tlv(&BerTag::universal(false, 6), &bytes)
    }

    /// Encode an application tag
    ///
    /// # Arguments
    /// * `tag_number` - Application tag number
    /// * `value` - Encoded value bytes
    /// * `constructed` - Whether this is a constructed type
    pub fn encode_application(
        &mut self,
        tag_number: u32,
        value: &[u8],
        constructed: bool,
    ) -> TachoResult<()> {
        self.encode_tlv(&BerTag::application(constructed, tag_number), value)
    }

    /// Encode a context-specific tag
    pub fn encode_context_specific(
        &mut self,
        tag_number: u32,
        value: &[u8],
        constructed: bool,
    ) -> TachoResult<()> {
        self.encode_tlv(&BerTag::context_specific(constructed, tag_number), value)
    }

    /// Append bytes that are already a complete TLV
    pub fn append_raw(&mut self, tlv: &[u8]) {
        self.buffer.extend_from_slice(tlv);
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the encoder buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_application_extended_tag() {
        let mut encoder = BerEncoder::new();
        encoder.encode_application(41, &[0x00], false).unwrap();
        assert_eq!(encoder.as_bytes(), &[0x5F, 0x29, 0x01, 0x00]);
    }

    #[test]
    fn test_encode_long_length() {
        let mut encoder = BerEncoder::new();
        encoder.encode_application(78, &[0u8; 200], true).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..4], &[0x7F, 0x4E, 0x81, 0xC8]);
        assert_eq!(bytes.len(), 204);
    }

    #[test]
    fn test_encode_object_identifier() {
        let mut encoder = BerEncoder::new();
        encoder.encode_object_identifier(&[1, 3, 132, 0, 35]).unwrap();
        assert_eq!(
            encoder.into_bytes(),
            vec![0x06, 0x05, 0x2B, 0x81, 0x04, 0x00, 0x23]
        );
    }

    #[test]
    fn test_encode_object_identifier_rejects_bad_arcs() {
        let mut encoder = BerEncoder::new();
        assert!(encoder.encode_object_identifier(&[1]).is_err());
        assert!(encoder.encode_object_identifier(&[1, 40]).is_err());
        assert!(encoder.encode_object_identifier(&[3, 1]).is_err());
    }

    #[test]
    fn test_encode_nested() {
        let mut inner = BerEncoder::new();
        inner.encode_context_specific(6, &[0x04, 0x01, 0x02], false).unwrap();
        let mut outer = BerEncoder::new();
        outer.encode_application(73, inner.as_bytes(), true).unwrap();
        assert_eq!(
            outer.into_bytes(),
            vec![0x7F, 0x49, 0x05, 0x86, 0x03, 0x04, 0x01, 0x02]
        );
    }
}
