//! Generation/version context threaded through every decode and encode call
//!
//! Generation 1 and generation 2 share field names but not byte layouts
//! (a generation 2 place record, for example, appends a GNSS block). The
//! context is a small `Copy` value passed explicitly, never stored globally,
//! since sibling sub-records in one file may legitimately use different
//! generations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-wire generation of the tachograph data format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Generation {
    /// Generation 1 (Annex 1B)
    #[default]
    Generation1,
    /// Generation 2 (Annex 1C)
    Generation2,
}

impl Generation {
    /// Map a generation byte (as stored in e.g. `FullCardNumberAndGeneration`)
    ///
    /// Unrecognized values fall back to generation 1.
    pub fn from_u8(value: u8) -> Self {
        match value {
            2 => Generation::Generation2,
            _ => Generation::Generation1,
        }
    }

    /// Generation byte value
    pub fn to_u8(self) -> u8 {
        match self {
            Generation::Generation1 => 1,
            Generation::Generation2 => 2,
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::Generation1 => write!(f, "Gen1"),
            Generation::Generation2 => write!(f, "Gen2"),
        }
    }
}

/// Data structure version inside generation 2
///
/// Version 2 cards (announced by EF Application_Identification_V2) record
/// GNSS positions with an authentication status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataVersion {
    #[default]
    Version1,
    Version2,
}

/// Codec context: generation plus data structure version
///
/// `Version::default()` is generation 1, version 1. This default is the
/// policy applied whenever the context is absent or unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Version {
    pub generation: Generation,
    pub data_version: DataVersion,
}

impl Version {
    /// Generation 1 context
    pub const GEN1: Version = Version {
        generation: Generation::Generation1,
        data_version: DataVersion::Version1,
    };

    /// Generation 2, version 1 context
    pub const GEN2: Version = Version {
        generation: Generation::Generation2,
        data_version: DataVersion::Version1,
    };

    /// Generation 2, version 2 context
    pub const GEN2_V2: Version = Version {
        generation: Generation::Generation2,
        data_version: DataVersion::Version2,
    };

    pub fn new(generation: Generation, data_version: DataVersion) -> Self {
        Self {
            generation,
            data_version,
        }
    }

    /// Derive the context from a card file block appendix byte
    ///
    /// `0x00`/`0x01` are generation 1 data/signature, `0x02`/`0x03` are
    /// generation 2 data/signature. Anything else is treated as generation 1.
    pub fn from_appendix(appendix: u8) -> Self {
        match appendix {
            0x02 | 0x03 => Self::GEN2,
            _ => Self::GEN1,
        }
    }

    /// Resolve an optional context, applying the generation 1 default
    pub fn or_default(version: Option<Version>) -> Self {
        version.unwrap_or_default()
    }

    pub fn is_gen2(&self) -> bool {
        self.generation == Generation::Generation2
    }

    /// Whether GNSS positions carry an authentication status byte
    pub fn has_position_authentication(&self) -> bool {
        self.is_gen2() && self.data_version == DataVersion::Version2
    }
}

impl From<Generation> for Version {
    fn from(generation: Generation) -> Self {
        Self::new(generation, DataVersion::Version1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_generation_1() {
        assert_eq!(Version::default(), Version::GEN1);
        assert_eq!(Version::or_default(None).generation, Generation::Generation1);
    }

    #[test]
    fn test_from_appendix() {
        assert_eq!(Version::from_appendix(0x00), Version::GEN1);
        assert_eq!(Version::from_appendix(0x01), Version::GEN1);
        assert_eq!(Version::from_appendix(0x02), Version::GEN2);
        assert_eq!(Version::from_appendix(0x03), Version::GEN2);
        assert_eq!(Version::from_appendix(0x7F), Version::GEN1);
    }

    #[test]
    fn test_position_authentication_needs_gen2_v2() {
        assert!(Version::GEN2_V2.has_position_authentication());
        assert!(!Version::GEN2.has_position_authentication());
        assert!(!Version::new(Generation::Generation1, DataVersion::Version2).has_position_authentication());
    }

    #[test]
    fn test_generation_byte() {
        assert_eq!(Generation::from_u8(2), Generation::Generation2);
        assert_eq!(Generation::from_u8(1), Generation::Generation1);
        assert_eq!(Generation::from_u8(9), Generation::Generation1);
        assert_eq!(Generation::Generation2.to_u8(), 2);
    }
}
