//! ASN.1 processing for tachograph certificates
//!
//! This crate implements the narrow BER subset needed to read and build
//! card-verifiable certificate bodies: tags (including extended and
//! application tags), definite lengths, TLV slices and object identifiers.

pub use tacho_core::error;

pub mod ber;

pub use ber::{BerDecoder, BerEncoder, BerLength, BerTag, BerTagClass, Tlv};
pub use error::{TachoError, TachoResult};
