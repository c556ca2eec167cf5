//! Security module for tachograph data
//!
//! This crate provides certificate parsing and signature verification:
//! generation 1 RSA certificates with signature recovery, generation 2 ECC
//! certificates with ECDSA over the Brainpool and NIST curves.

pub use tacho_core::error;

pub mod certificate;
pub mod constants;
pub mod curve;
pub mod ecdsa;
pub mod hash;
pub mod references;
pub mod rsa;
pub mod status;

pub use certificate::{
    Certificate, EccCertificate, EccCertificateBody, PublicKey, RsaCertificate,
    RsaCertificateContent,
};
pub use curve::Curve;
pub use ecdsa::EcPublicKey;
pub use hash::HashAlgorithm;
pub use references::{CertificateAuthorityReference, CertificateHolderReference};
pub use rsa::{RsaPublicKey, RsaRootKey};
pub use status::SignatureStatus;
pub use error::{TachoError, TachoResult};
