//! Tachograph card dump files
//!
//! This crate provides the block framing of card dumps, the elementary file
//! catalogue, the cyclic-buffer containers and the driver card document
//! that decodes a dump into records and marshals it back.

pub use tacho_core::error;

pub mod activity;
pub mod application;
pub mod block;
pub mod cyclic;
pub mod driver_card;
pub mod file_id;
pub mod options;

pub use activity::{ActivityDay, DriverActivityData};
pub use application::{BlockSignature, CardDownload, DriverCardApplication, DriverCardIdentification};
pub use block::{join_blocks, split_blocks, Block};
pub use cyclic::{CyclicRecords, PointerWidth};
pub use driver_card::{BlockSlot, DriverCardFile, Issue};
pub use file_id::ElementaryFileId;
pub use options::UnmarshalOptions;
pub use error::{TachoError, TachoResult};
