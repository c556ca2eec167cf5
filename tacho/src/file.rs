//! File type detection and the unmarshal/marshal entry points

use serde::{Deserialize, Serialize};
use std::fmt;
use tacho_card::{DriverCardFile, UnmarshalOptions};
use tacho_core::error::{TachoError, TachoResult};

/// First byte of a vehicle unit transfer (TREP service response)
const VEHICLE_UNIT_TAG: u8 = 0x76;
/// FID of EF_ICC, the first block of a card dump
const CARD_DUMP_TAG: [u8; 2] = [0x00, 0x02];

/// Kind of dump, judged from its first bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    DriverCard,
    VehicleUnit,
    Unknown,
}

impl FileType {
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(&CARD_DUMP_TAG) {
            FileType::DriverCard
        } else if data.first() == Some(&VEHICLE_UNIT_TAG) {
            FileType::VehicleUnit
        } else {
            FileType::Unknown
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::DriverCard => write!(f, "driver card"),
            FileType::VehicleUnit => write!(f, "vehicle unit"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A decoded dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum File {
    DriverCard(DriverCardFile),
}

impl File {
    pub fn file_type(&self) -> FileType {
        match self {
            File::DriverCard(_) => FileType::DriverCard,
        }
    }

    pub fn marshal(&self) -> TachoResult<Vec<u8>> {
        match self {
            File::DriverCard(file) => file.marshal(),
        }
    }
}

/// Decode a dump with default options
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("driver.ddd").unwrap();
/// let file = tacho::unmarshal_file(&data).unwrap();
/// println!("{}", serde_json::to_string_pretty(&file).unwrap());
/// ```
pub fn unmarshal_file(data: &[u8]) -> TachoResult<File> {
    unmarshal_file_with(data, &UnmarshalOptions::default())
}

/// Decode a dump
///
/// # Errors
/// [`TachoError::UnsupportedFileType`] for vehicle unit transfers and
/// unrecognised input; decoding errors of the dump otherwise.
pub fn unmarshal_file_with(data: &[u8], options: &UnmarshalOptions) -> TachoResult<File> {
    let file_type = FileType::detect(data);
    log::debug!("unmarshalling {}-byte {} file", data.len(), file_type);
    match file_type {
        FileType::DriverCard => DriverCardFile::unmarshal(data, options).map(File::DriverCard),
        FileType::VehicleUnit => Err(TachoError::UnsupportedFileType(
            "vehicle unit transfers are not supported".to_string(),
        )),
        FileType::Unknown => Err(TachoError::UnsupportedFileType(match data.first() {
            Some(byte) => format!("unrecognised leading byte 0x{:02X}", byte),
            None => "empty input".to_string(),
        })),
    }
}

/// Encode a decoded dump back to bytes
pub fn marshal_file(file: &File) -> TachoResult<Vec<u8>> {
    file.marshal()
}
