//! Generation 2 certificates
//!
//! ```text
//! 7F21 CV certificate
//!   7F4E certificate body
//!     5F29 profile identifier (1)
//!     42   certification authority reference (8)
//!     5F4C holder authorisation (7)
//!     7F49 public key
//!       06 curve OID
//!       86 public point 04 || x || y
//!     5F20 certificate holder reference (8)
//!     5F25 effective date (TimeReal)
//!     5F24 expiration date (TimeReal)
//!   5F37 signature r || s
//! ```
//!
//! The signature covers the body TLV exactly as encoded, header included.

use crate::constants::{
    ECC_CERTIFICATE_MAX_LENGTH, ECC_CERTIFICATE_MIN_LENGTH, HOLDER_AUTHORISATION_LENGTH,
};
use crate::curve::Curve;
use crate::ecdsa::EcPublicKey;
use crate::references::{CertificateAuthorityReference, CertificateHolderReference};
use crate::status::SignatureStatus;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tacho_asn1::ber::{tags, BerDecoder, BerEncoder};
use tacho_core::datatypes::{decode_time_real, encode_time_real, TimeReal};
use tacho_core::error::{TachoError, TachoResult};

/// Fields of a certificate body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EccCertificateBody {
    pub profile_identifier: u8,
    pub authority_reference: CertificateAuthorityReference,
    pub holder_authorisation: [u8; HOLDER_AUTHORISATION_LENGTH],
    pub public_key: EcPublicKey,
    pub holder_reference: CertificateHolderReference,
    pub effective_date: Option<TimeReal>,
    pub expiration_date: Option<TimeReal>,
}

fn fixed<const N: usize>(field: &str, value: &[u8]) -> TachoResult<[u8; N]> {
    value.try_into().map_err(|_| {
        TachoError::MalformedAsn1(format!(
            "{} has {} bytes, expected {}",
            field,
            value.len(),
            N
        ))
    })
}

impl EccCertificateBody {
    /// Decode the content of the `7F4E` body
    pub fn decode(content: &[u8]) -> TachoResult<Self> {
        let mut decoder = BerDecoder::new(content);

        let profile = decoder.decode_tagged(tags::PROFILE_IDENTIFIER)?;
        let [profile_identifier] = fixed::<1>("profile identifier", profile.value)?;

        let car = decoder.decode_tagged(tags::AUTHORITY_REFERENCE)?;
        let authority_reference =
            CertificateAuthorityReference::from_bytes(fixed("authority reference", car.value)?);

        let cha = decoder.decode_tagged(tags::HOLDER_AUTHORISATION)?;
        let holder_authorisation = fixed("holder authorisation", cha.value)?;

        let key = decoder.decode_tagged(tags::PUBLIC_KEY)?;
        let public_key = decode_public_key(key.value)?;

        let chr = decoder.decode_tagged(tags::HOLDER_REFERENCE)?;
        let holder_reference =
            CertificateHolderReference::from_bytes(fixed("holder reference", chr.value)?);

        let effective = decoder.decode_tagged(tags::EFFECTIVE_DATE)?;
        let effective_date = decode_time_real(&fixed::<4>("effective date", effective.value)?)?;

        let expiration = decoder.decode_tagged(tags::EXPIRATION_DATE)?;
        let expiration_date =
            decode_time_real(&fixed::<4>("expiration date", expiration.value)?)?;

        decoder.finish()?;

        Ok(Self {
            profile_identifier,
            authority_reference,
            holder_authorisation,
            public_key,
            holder_reference,
            effective_date,
            expiration_date,
        })
    }

    /// Encode the complete `7F4E` TLV
    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let mut key = BerEncoder::new();
        key.encode_object_identifier(self.public_key.curve().oid())?;
        key.encode_tlv(&tags::PUBLIC_POINT, self.public_key.point())?;

        let mut content = BerEncoder::with_capacity(256);
        content.encode_tlv(&tags::PROFILE_IDENTIFIER, &[self.profile_identifier])?;
        content.encode_tlv(&tags::AUTHORITY_REFERENCE, &self.authority_reference.to_bytes())?;
        content.encode_tlv(&tags::HOLDER_AUTHORISATION, &self.holder_authorisation)?;
        content.encode_tlv(&tags::PUBLIC_KEY, key.as_bytes())?;
        content.encode_tlv(&tags::HOLDER_REFERENCE, &self.holder_reference.to_bytes())?;
        content.encode_tlv(&tags::EFFECTIVE_DATE, &encode_time_real(self.effective_date))?;
        content.encode_tlv(&tags::EXPIRATION_DATE, &encode_time_real(self.expiration_date))?;

        let mut body = BerEncoder::new();
        body.encode_tlv(&tags::CERTIFICATE_BODY, content.as_bytes())?;
        Ok(body.into_bytes())
    }
}

fn decode_public_key(content: &[u8]) -> TachoResult<EcPublicKey> {
    let mut decoder = BerDecoder::new(content);
    let oid = decoder.decode_object_identifier()?;
    let curve = Curve::from_oid(&oid)?;
    let point = decoder.decode_tagged(tags::PUBLIC_POINT)?;
    decoder.finish()?;
    EcPublicKey::from_uncompressed(curve, point.value)
}

/// Generation 2 ECC certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EccCertificate {
    body: EccCertificateBody,
    #[serde(with = "serde_bytes")]
    signature: Vec<u8>,
    /// Offsets of the body TLV within `raw`
    body_range: Range<usize>,
    status: SignatureStatus,
    #[serde(with = "serde_bytes")]
    raw: Vec<u8>,
}

impl EccCertificate {
    /// Decode a complete `7F21` certificate
    ///
    /// # Error Handling
    /// - [`TachoError::CertificateLength`] outside 204..=341 bytes
    /// - [`TachoError::MalformedAsn1`] for structural errors, including
    ///   bytes after the certificate
    /// - [`TachoError::UnsupportedCurve`] for an unknown curve OID
    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        if !(ECC_CERTIFICATE_MIN_LENGTH..=ECC_CERTIFICATE_MAX_LENGTH).contains(&data.len()) {
            return Err(TachoError::CertificateLength {
                actual: data.len(),
                min: ECC_CERTIFICATE_MIN_LENGTH,
                max: ECC_CERTIFICATE_MAX_LENGTH,
            });
        }

        let mut outer = BerDecoder::new(data);
        let certificate = outer.decode_tagged(tags::CV_CERTIFICATE)?;
        outer.finish()?;

        let header_length = certificate.raw.len() - certificate.value.len();
        let mut inner = BerDecoder::new(certificate.value);
        let body_tlv = inner.decode_tagged(tags::CERTIFICATE_BODY)?;
        let body_range = header_length..header_length + body_tlv.raw.len();
        let body = EccCertificateBody::decode(body_tlv.value)?;

        let signature = inner.decode_tagged(tags::SIGNATURE)?;
        inner.finish()?;

        Ok(Self {
            body,
            signature: signature.value.to_vec(),
            body_range,
            status: SignatureStatus::Unverified,
            raw: data.to_vec(),
        })
    }

    /// Wrap an encoded body TLV and its signature into a certificate
    pub fn assemble(body_tlv: &[u8], signature: &[u8]) -> TachoResult<Self> {
        let mut content = BerEncoder::new();
        content.append_raw(body_tlv);
        content.encode_tlv(&tags::SIGNATURE, signature)?;
        let mut certificate = BerEncoder::new();
        certificate.encode_tlv(&tags::CV_CERTIFICATE, content.as_bytes())?;
        Self::decode(certificate.as_bytes())
    }

    pub fn body(&self) -> &EccCertificateBody {
        &self.body
    }

    /// Body TLV bytes covered by the signature
    pub fn signed_bytes(&self) -> &[u8] {
        &self.raw[self.body_range.clone()]
    }

    /// Signature `r || s`
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn authority_reference(&self) -> CertificateAuthorityReference {
        self.body.authority_reference
    }

    pub fn holder_reference(&self) -> CertificateHolderReference {
        self.body.holder_reference
    }

    pub fn public_key(&self) -> &EcPublicKey {
        &self.body.public_key
    }

    pub fn status(&self) -> SignatureStatus {
        self.status
    }

    pub(crate) fn mark_invalid(&mut self) {
        self.status = SignatureStatus::Invalid;
    }

    /// Verify the signature with the issuer's public key
    ///
    /// The digest is chosen by the issuer key's curve. The outcome is
    /// recorded on the certificate and failures are also returned.
    pub fn verify(&mut self, issuer: &EcPublicKey) -> TachoResult<()> {
        log::trace!(
            "verifying certificate {} against {} key",
            self.body.holder_reference,
            issuer.curve()
        );
        let result = issuer.verify(self.signed_bytes(), &self.signature);
        self.status = SignatureStatus::from_result(&result);
        if let Err(e) = &result {
            log::trace!("certificate {} failed: {}", self.body.holder_reference, e);
        }
        result
    }

    /// Verify a root certificate with its own public key
    pub fn verify_self_signed(&mut self) -> TachoResult<()> {
        let key = self.body.public_key.clone();
        self.verify(&key)
    }
}
