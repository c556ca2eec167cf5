//! Generation 1 certificates
//!
//! A certificate is `signature (128) || Cn' (58) || CAR (8)`. Only the
//! authority reference can be read without the issuer's key: the rest of
//! the content is recovered from the signature.
//!
//! Recovered content `C = Cr' || Cn'` (164 bytes):
//!
//! | field | bytes |
//! |---|---|
//! | certificate profile identifier | 1 |
//! | certification authority reference | 8 |
//! | holder authorisation | 7 |
//! | end of validity | 4 |
//! | certificate holder reference | 8 |
//! | public key modulus | 128 |
//! | public key exponent | 8 |

use crate::constants::{
    HOLDER_AUTHORISATION_LENGTH, RSA_CERTIFICATE_LENGTH, RSA_MODULUS_LENGTH,
    RSA_NON_RECOVERABLE_LENGTH, RSA_RECOVERABLE_LENGTH, RSA_RECOVERY_HEADER,
    RSA_RECOVERY_TRAILER,
};
use crate::hash::HashAlgorithm;
use crate::references::{CertificateAuthorityReference, CertificateHolderReference};
use crate::rsa::RsaPublicKey;
use crate::status::SignatureStatus;
use serde::{Deserialize, Serialize};
use tacho_core::canvas::RecordReader;
use tacho_core::datatypes::{decode_time_real, TimeReal};
use tacho_core::error::{expect_length, TachoError, TachoResult};

const SHA1_LENGTH: usize = 20;

/// Content recovered from a verified certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaCertificateContent {
    pub profile_identifier: u8,
    pub authority_reference: CertificateAuthorityReference,
    pub holder_authorisation: [u8; HOLDER_AUTHORISATION_LENGTH],
    /// `None` when the wire value is zero
    pub end_of_validity: Option<TimeReal>,
    pub holder_reference: CertificateHolderReference,
    pub public_key: RsaPublicKey,
}

impl RsaCertificateContent {
    /// Content length (`Cr' || Cn'`)
    pub const LENGTH: usize = RSA_RECOVERABLE_LENGTH + RSA_NON_RECOVERABLE_LENGTH;

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_length("RsaCertificateContent", data, Self::LENGTH)?;
        let mut reader = RecordReader::new("RsaCertificateContent", data);
        let profile_identifier = reader.read_u8()?;
        let authority_reference = CertificateAuthorityReference::decode(reader.read_bytes(8)?)?;
        let holder_authorisation = reader.read_array::<HOLDER_AUTHORISATION_LENGTH>()?;
        let end_of_validity = decode_time_real(reader.read_bytes(4)?)?;
        let holder_reference = CertificateHolderReference::decode(reader.read_bytes(8)?)?;
        let public_key = RsaPublicKey::decode(reader.read_rest())?;
        Ok(Self {
            profile_identifier,
            authority_reference,
            holder_authorisation,
            end_of_validity,
            holder_reference,
            public_key,
        })
    }
}

/// Generation 1 RSA certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaCertificate {
    authority_reference: CertificateAuthorityReference,
    content: Option<RsaCertificateContent>,
    status: SignatureStatus,
    #[serde(with = "serde_bytes")]
    raw: Vec<u8>,
}

impl RsaCertificate {
    pub const LENGTH: usize = RSA_CERTIFICATE_LENGTH;

    /// Decode exactly 194 bytes
    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        if data.len() != Self::LENGTH {
            return Err(TachoError::CertificateLength {
                actual: data.len(),
                min: Self::LENGTH,
                max: Self::LENGTH,
            });
        }
        let authority_reference =
            CertificateAuthorityReference::decode(&data[Self::LENGTH - 8..])?;
        Ok(Self {
            authority_reference,
            content: None,
            status: SignatureStatus::Unverified,
            raw: data.to_vec(),
        })
    }

    /// Bytes the certificate was decoded from
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn signature(&self) -> &[u8] {
        &self.raw[..RSA_MODULUS_LENGTH]
    }

    /// Non-recoverable content `Cn'`
    pub fn non_recoverable(&self) -> &[u8] {
        &self.raw[RSA_MODULUS_LENGTH..RSA_MODULUS_LENGTH + RSA_NON_RECOVERABLE_LENGTH]
    }

    pub fn authority_reference(&self) -> CertificateAuthorityReference {
        self.authority_reference
    }

    pub fn status(&self) -> SignatureStatus {
        self.status
    }

    /// Recovered content, present after a successful verification
    pub fn content(&self) -> Option<&RsaCertificateContent> {
        self.content.as_ref()
    }

    /// Holder reference, known once the content has been recovered
    pub fn holder_reference(&self) -> Option<CertificateHolderReference> {
        self.content.as_ref().map(|c| c.holder_reference)
    }

    /// Certified public key
    ///
    /// # Error Handling
    /// [`TachoError::MissingPublicKey`] before a successful verification.
    pub fn public_key(&self) -> TachoResult<&RsaPublicKey> {
        self.content
            .as_ref()
            .map(|c| &c.public_key)
            .ok_or_else(|| {
                TachoError::MissingPublicKey(format!(
                    "certificate issued by {} has not been recovered",
                    self.authority_reference
                ))
            })
    }

    pub(crate) fn mark_invalid(&mut self) {
        self.status = SignatureStatus::Invalid;
        self.content = None;
    }

    /// Verify with the issuer's key and recover the content
    ///
    /// The outcome is recorded on the certificate. A failed verification
    /// clears previously recovered content.
    pub fn verify(&mut self, issuer: &RsaPublicKey) -> TachoResult<&RsaCertificateContent> {
        let result = self.recover_content(issuer);
        self.status = SignatureStatus::from_result(&result);
        match result {
            Ok(content) => {
                log::trace!(
                    "RSA certificate {} verified by {}",
                    content.holder_reference,
                    self.authority_reference
                );
                Ok(self.content.insert(content))
            }
            Err(e) => {
                log::trace!("RSA certificate from {} failed: {}", self.authority_reference, e);
                self.content = None;
                Err(e)
            }
        }
    }

    fn recover_content(&self, issuer: &RsaPublicKey) -> TachoResult<RsaCertificateContent> {
        let recovered = issuer.recover(self.signature())?;
        let last = recovered.len() - 1;
        if recovered[0] != RSA_RECOVERY_HEADER || recovered[last] != RSA_RECOVERY_TRAILER {
            return Err(TachoError::SignatureMismatch(format!(
                "recovered block framed by {:02X}..{:02X}, expected {:02X}..{:02X}",
                recovered[0], recovered[last], RSA_RECOVERY_HEADER, RSA_RECOVERY_TRAILER
            )));
        }
        let recoverable = &recovered[1..1 + RSA_RECOVERABLE_LENGTH];
        let hash = &recovered[1 + RSA_RECOVERABLE_LENGTH..1 + RSA_RECOVERABLE_LENGTH + SHA1_LENGTH];

        let mut content = recoverable.to_vec();
        content.extend_from_slice(self.non_recoverable());
        if HashAlgorithm::Sha1.digest(&content) != hash {
            return Err(TachoError::SignatureMismatch(
                "recovered hash does not match certificate content".to_string(),
            ));
        }
        RsaCertificateContent::decode(&content)
    }
}
