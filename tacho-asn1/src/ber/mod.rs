//! BER (Basic Encoding Rules) subset
//!
//! Each value is a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! - **Class** (2 bits): Universal (00), Application (01), Context-specific (10), Private (11)
//! - **Constructed/Primitive** (1 bit)
//! - **Tag Number**: 0-30 in the first byte, or `11111` followed by base-128 bytes
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): lengths 0-127
//! - **Long form**: `0x80 | n`, then `n` big-endian bytes
//!
//! Only definite lengths are supported. Decoded TLVs expose their exact
//! encoded bytes ([`Tlv::raw`]) since signatures are computed over them.

pub mod decoder;
pub mod encoder;
pub mod tags;
pub mod types;

pub use decoder::{decode_oid_value, format_oid, BerDecoder, Tlv};
pub use encoder::BerEncoder;
pub use types::{BerLength, BerTag, BerTagClass};
