//! Elementary file identifiers of a card dump

use serde::{Deserialize, Serialize};
use std::fmt;

/// Elementary file (EF) of a tachograph card
///
/// Identifiers not in the catalogue decode to `Unknown` and keep their
/// two-byte code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementaryFileId {
    Icc,
    Ic,
    ApplicationIdentification,
    Events,
    Faults,
    DriverActivity,
    VehiclesUsed,
    Places,
    CurrentUsage,
    ControlActivity,
    CardDownload,
    Identification,
    DrivingLicenceInfo,
    SpecificConditions,
    VehicleUnitsUsed,
    GnssPlaces,
    ApplicationIdentificationV2,
    /// Card_Certificate in generation 1, CardMA_Certificate in generation 2
    CardCertificate,
    CardSignCertificate,
    CaCertificate,
    LinkCertificate,
    Unknown(u16),
}

const CATALOGUE: &[(ElementaryFileId, u16)] = &[
    (ElementaryFileId::Icc, 0x0002),
    (ElementaryFileId::Ic, 0x0005),
    (ElementaryFileId::ApplicationIdentification, 0x0501),
    (ElementaryFileId::Events, 0x0502),
    (ElementaryFileId::Faults, 0x0503),
    (ElementaryFileId::DriverActivity, 0x0504),
    (ElementaryFileId::VehiclesUsed, 0x0505),
    (ElementaryFileId::Places, 0x0506),
    (ElementaryFileId::CurrentUsage, 0x0507),
    (ElementaryFileId::ControlActivity, 0x0508),
    (ElementaryFileId::CardDownload, 0x050E),
    (ElementaryFileId::Identification, 0x0520),
    (ElementaryFileId::DrivingLicenceInfo, 0x0521),
    (ElementaryFileId::SpecificConditions, 0x0522),
    (ElementaryFileId::VehicleUnitsUsed, 0x0523),
    (ElementaryFileId::GnssPlaces, 0x0524),
    (ElementaryFileId::ApplicationIdentificationV2, 0x0525),
    (ElementaryFileId::CardCertificate, 0xC100),
    (ElementaryFileId::CardSignCertificate, 0xC101),
    (ElementaryFileId::CaCertificate, 0xC108),
    (ElementaryFileId::LinkCertificate, 0xC109),
];

impl ElementaryFileId {
    /// Application files in the order a dump lists them
    pub const APPLICATION_FILES: [ElementaryFileId; 15] = [
        ElementaryFileId::ApplicationIdentification,
        ElementaryFileId::ApplicationIdentificationV2,
        ElementaryFileId::Identification,
        ElementaryFileId::CardDownload,
        ElementaryFileId::DrivingLicenceInfo,
        ElementaryFileId::Events,
        ElementaryFileId::Faults,
        ElementaryFileId::DriverActivity,
        ElementaryFileId::VehiclesUsed,
        ElementaryFileId::Places,
        ElementaryFileId::CurrentUsage,
        ElementaryFileId::ControlActivity,
        ElementaryFileId::SpecificConditions,
        ElementaryFileId::VehicleUnitsUsed,
        ElementaryFileId::GnssPlaces,
    ];

    pub const CERTIFICATE_FILES: [ElementaryFileId; 4] = [
        ElementaryFileId::CardCertificate,
        ElementaryFileId::CardSignCertificate,
        ElementaryFileId::CaCertificate,
        ElementaryFileId::LinkCertificate,
    ];

    pub fn from_u16(code: u16) -> Self {
        CATALOGUE
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(id, _)| *id)
            .unwrap_or(ElementaryFileId::Unknown(code))
    }

    pub fn to_u16(self) -> u16 {
        if let ElementaryFileId::Unknown(code) = self {
            return code;
        }
        CATALOGUE
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, code)| *code)
            .unwrap_or_default()
    }

    pub fn is_certificate(self) -> bool {
        Self::CERTIFICATE_FILES.contains(&self)
    }

    /// Files common to every card, outside the tachograph application
    pub fn is_common(self) -> bool {
        matches!(self, ElementaryFileId::Icc | ElementaryFileId::Ic)
    }
}

impl From<u16> for ElementaryFileId {
    fn from(code: u16) -> Self {
        Self::from_u16(code)
    }
}

impl fmt::Display for ElementaryFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (0x{:04X})", self, self.to_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_round_trip() {
        for (id, code) in CATALOGUE {
            assert_eq!(ElementaryFileId::from_u16(*code), *id);
            assert_eq!(id.to_u16(), *code);
        }
    }

    #[test]
    fn test_catalogue_has_no_duplicates() {
        for (i, (id, code)) in CATALOGUE.iter().enumerate() {
            for (other_id, other_code) in &CATALOGUE[i + 1..] {
                assert_ne!(id, other_id);
                assert_ne!(code, other_code);
            }
        }
    }

    #[test]
    fn test_unknown_keeps_code() {
        let id = ElementaryFileId::from_u16(0x0526);
        assert_eq!(id, ElementaryFileId::Unknown(0x0526));
        assert_eq!(id.to_u16(), 0x0526);
        assert_eq!(ElementaryFileId::Places.to_string(), "Places (0x0506)");
    }

    #[test]
    fn test_kinds() {
        assert!(ElementaryFileId::CaCertificate.is_certificate());
        assert!(!ElementaryFileId::Places.is_certificate());
        assert!(ElementaryFileId::Icc.is_common());
    }
}
