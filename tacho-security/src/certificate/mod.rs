//! Certificates of both generations

pub mod ecc;
pub mod rsa;

pub use ecc::{EccCertificate, EccCertificateBody};
pub use rsa::{RsaCertificate, RsaCertificateContent};

use crate::ecdsa::EcPublicKey;
use crate::references::{CertificateAuthorityReference, CertificateHolderReference};
use crate::rsa::RsaPublicKey;
use crate::status::SignatureStatus;
use serde::{Deserialize, Serialize};
use tacho_core::error::{TachoError, TachoResult};
use tacho_core::version::{Generation, Version};

/// Public key of either generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ecc(EcPublicKey),
}

/// Certificate of either generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Certificate {
    Rsa(RsaCertificate),
    Ecc(EccCertificate),
}

impl Certificate {
    /// Decode according to the generation: RSA for generation 1, ECC for
    /// generation 2
    pub fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        match version.generation {
            Generation::Generation1 => RsaCertificate::decode(data).map(Certificate::Rsa),
            Generation::Generation2 => EccCertificate::decode(data).map(Certificate::Ecc),
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            Certificate::Rsa(_) => Generation::Generation1,
            Certificate::Ecc(_) => Generation::Generation2,
        }
    }

    /// Bytes the certificate was decoded from
    pub fn raw(&self) -> &[u8] {
        match self {
            Certificate::Rsa(c) => c.raw(),
            Certificate::Ecc(c) => c.raw(),
        }
    }

    pub fn authority_reference(&self) -> CertificateAuthorityReference {
        match self {
            Certificate::Rsa(c) => c.authority_reference(),
            Certificate::Ecc(c) => c.authority_reference(),
        }
    }

    /// Holder reference; for RSA only after the content was recovered
    pub fn holder_reference(&self) -> Option<CertificateHolderReference> {
        match self {
            Certificate::Rsa(c) => c.holder_reference(),
            Certificate::Ecc(c) => Some(c.holder_reference()),
        }
    }

    pub fn status(&self) -> SignatureStatus {
        match self {
            Certificate::Rsa(c) => c.status(),
            Certificate::Ecc(c) => c.status(),
        }
    }

    /// Certified public key
    ///
    /// # Error Handling
    /// [`TachoError::MissingPublicKey`] for an RSA certificate that has not
    /// been verified yet.
    pub fn public_key(&self) -> TachoResult<PublicKey> {
        match self {
            Certificate::Rsa(c) => c.public_key().cloned().map(PublicKey::Rsa),
            Certificate::Ecc(c) => Ok(PublicKey::Ecc(c.public_key().clone())),
        }
    }

    /// Verify with the issuer's key, recording the outcome
    ///
    /// A key of the other generation is a failed verification.
    pub fn verify(&mut self, issuer: &PublicKey) -> TachoResult<()> {
        match (self, issuer) {
            (Certificate::Rsa(c), PublicKey::Rsa(key)) => c.verify(key).map(|_| ()),
            (Certificate::Ecc(c), PublicKey::Ecc(key)) => c.verify(key),
            (certificate, _) => {
                let e = TachoError::SignatureMismatch(format!(
                    "{} certificate cannot be verified with a key of the other generation",
                    certificate.generation()
                ));
                match certificate {
                    Certificate::Rsa(c) => c.mark_invalid(),
                    Certificate::Ecc(c) => c.mark_invalid(),
                }
                Err(e)
            }
        }
    }
}
