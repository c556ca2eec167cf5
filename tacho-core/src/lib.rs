//! Core types for tachograph data
//!
//! This crate provides the error type, the generation/version context, the
//! canvas used by every fixed-size record encoder, the wire enumerations and
//! the primitive datatypes shared by the other crates.

pub mod canvas;
pub mod datatypes;
pub mod enums;
pub mod error;
pub mod record;
pub mod version;

pub use canvas::{Canvas, RecordReader};
pub use enums::WireEnum;
pub use error::{TachoError, TachoResult};
pub use record::Record;
pub use version::{DataVersion, Generation, Version};
