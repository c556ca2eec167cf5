//! tacho - Rust implementation of the EU digital tachograph data dictionary
//!
//! Decodes tachograph dumps into typed documents and encodes them back,
//! byte for byte when nothing was changed.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `tacho-core`: error type, version context, canvas, wire enums, primitives
//! - `tacho-asn1`: BER subset used by generation 2 certificates
//! - `tacho-security`: certificates and signature verification
//! - `tacho-records`: data dictionary records
//! - `tacho-card`: card dump framing and the driver card document
//!
//! # Usage
//!
//! ```no_run
//! use tacho::{unmarshal_file_with, File, UnmarshalOptions};
//!
//! let data = std::fs::read("driver.ddd").unwrap();
//! let File::DriverCard(card) = unmarshal_file_with(&data, &UnmarshalOptions::lenient()).unwrap();
//! for issue in &card.issues {
//!     eprintln!("{}: {}", issue.file, issue.message);
//! }
//! ```

pub mod file;

pub use file::{marshal_file, unmarshal_file, unmarshal_file_with, File, FileType};
pub use tacho_card::{DriverCardFile, UnmarshalOptions};
pub use tacho_core::{DataVersion, Generation, Record, TachoError, TachoResult, Version};

pub mod types {
    pub use tacho_core::*;
}

pub mod asn1 {
    pub use tacho_asn1::*;
}

pub mod security {
    pub use tacho_security::*;
}

pub mod records {
    pub use tacho_records::*;
}

pub mod card {
    pub use tacho_card::*;
}
