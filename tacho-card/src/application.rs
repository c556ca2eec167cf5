//! Tachograph application of a driver card
//!
//! A generation 2 card carries two applications side by side: the
//! generation 1 one (appendix 0x00/0x01) and the generation 2 one
//! (appendix 0x02/0x03). Both are held in a [`DriverCardApplication`]
//! whose version context selects the record layouts. The context is fixed
//! when the application is created; a version 2 card gets
//! [`Version::GEN2_V2`] from the start.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tacho_core::datatypes::TimeReal;
use tacho_core::error::{expect_length, TachoError, TachoResult};
use tacho_core::version::{Generation, Version};
use tacho_core::{Canvas, Record, RecordReader};
use tacho_records::{
    CardControlActivityDataRecord, CardCurrentUse, CardDrivingLicenceInformation, CardEventRecord,
    CardFaultRecord, CardIdentification, CardVehicleRecord, CardVehicleUnitRecord,
    DriverCardApplicationIdentification, DriverCardApplicationIdentificationV2,
    DriverCardHolderIdentification, GnssAccumulatedDrivingRecord, PlaceRecord, SpecificConditionRecord,
};
use tacho_security::{Certificate, PublicKey};

use crate::activity::DriverActivityData;
use crate::cyclic::{CyclicRecords, PointerWidth};
use crate::file_id::ElementaryFileId;

/// Identification file: card identification followed by holder identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverCardIdentification {
    pub card: CardIdentification,
    pub holder: DriverCardHolderIdentification,
}

impl DriverCardIdentification {
    pub const LENGTH: usize = CardIdentification::LENGTH + DriverCardHolderIdentification::LENGTH;

    pub fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length("DriverCardIdentification", data, Self::LENGTH)?;
        let (card, holder) = data.split_at(CardIdentification::LENGTH);
        Ok(Self {
            card: CardIdentification::decode(card, version)?,
            holder: DriverCardHolderIdentification::decode(holder, version)?,
        })
    }

    pub fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let mut result = self.card.encode(version)?;
        result.extend(self.holder.encode(version)?);
        Ok(result)
    }
}

/// Time of the last download of the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardDownload {
    pub last_card_download: Option<TimeReal>,
}

impl CardDownload {
    pub const LENGTH: usize = 4;

    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_length("CardDownload", data, Self::LENGTH)?;
        let mut reader = RecordReader::new("CardDownload", data);
        let last_card_download = reader.read_time_real()?;
        reader.finish()?;
        Ok(Self { last_card_download })
    }

    pub fn encode(&self) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::zeroed("CardDownload", Self::LENGTH);
        canvas.paint_time_real(self.last_card_download)?;
        canvas.finish()
    }
}

/// Signature block that followed a data block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSignature {
    pub file: ElementaryFileId,
    pub signature: Bytes,
}

/// Decoded elementary files of one application generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverCardApplication {
    pub version: Version,
    pub application_identification: Option<DriverCardApplicationIdentification>,
    pub application_identification_v2: Option<DriverCardApplicationIdentificationV2>,
    pub identification: Option<DriverCardIdentification>,
    pub card_download: Option<CardDownload>,
    pub driving_licence_info: Option<CardDrivingLicenceInformation>,
    pub events: Option<CyclicRecords<CardEventRecord>>,
    pub faults: Option<CyclicRecords<CardFaultRecord>>,
    pub driver_activity: Option<DriverActivityData>,
    pub vehicles_used: Option<CyclicRecords<CardVehicleRecord>>,
    pub places: Option<CyclicRecords<PlaceRecord>>,
    pub current_usage: Option<CardCurrentUse>,
    pub control_activity: Option<CardControlActivityDataRecord>,
    pub specific_conditions: Option<CyclicRecords<SpecificConditionRecord>>,
    pub vehicle_units_used: Option<CyclicRecords<CardVehicleUnitRecord>>,
    pub gnss_places: Option<CyclicRecords<GnssAccumulatedDrivingRecord>>,
    /// Card_Certificate (generation 1) or CardMA_Certificate (generation 2)
    pub card_certificate: Option<Certificate>,
    pub card_sign_certificate: Option<Certificate>,
    pub ca_certificate: Option<Certificate>,
    pub link_certificate: Option<Certificate>,
    pub signatures: Vec<BlockSignature>,
}

impl DriverCardApplication {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            application_identification: None,
            application_identification_v2: None,
            identification: None,
            card_download: None,
            driving_licence_info: None,
            events: None,
            faults: None,
            driver_activity: None,
            vehicles_used: None,
            places: None,
            current_usage: None,
            control_activity: None,
            specific_conditions: None,
            vehicle_units_used: None,
            gnss_places: None,
            card_certificate: None,
            card_sign_certificate: None,
            ca_certificate: None,
            link_certificate: None,
            signatures: Vec::new(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.version.generation
    }

    /// Whether `file` belongs to an application of this generation
    pub fn supports(&self, file: ElementaryFileId) -> bool {
        match file {
            ElementaryFileId::ApplicationIdentificationV2
            | ElementaryFileId::VehicleUnitsUsed
            | ElementaryFileId::GnssPlaces
            | ElementaryFileId::CardSignCertificate
            | ElementaryFileId::LinkCertificate => self.version.is_gen2(),
            ElementaryFileId::Icc | ElementaryFileId::Ic | ElementaryFileId::Unknown(_) => false,
            _ => true,
        }
    }

    fn pointer_width(&self, file: ElementaryFileId) -> PointerWidth {
        let gen2 = self.version.is_gen2();
        match file {
            ElementaryFileId::Places if !gen2 => PointerWidth::One,
            ElementaryFileId::SpecificConditions if !gen2 => PointerWidth::None,
            ElementaryFileId::Events | ElementaryFileId::Faults => PointerWidth::None,
            _ => PointerWidth::Two,
        }
    }

    /// Whether a value for `file` is already held
    pub fn contains(&self, file: ElementaryFileId) -> bool {
        match file {
            ElementaryFileId::ApplicationIdentification => self.application_identification.is_some(),
            ElementaryFileId::ApplicationIdentificationV2 => self.application_identification_v2.is_some(),
            ElementaryFileId::Identification => self.identification.is_some(),
            ElementaryFileId::CardDownload => self.card_download.is_some(),
            ElementaryFileId::DrivingLicenceInfo => self.driving_licence_info.is_some(),
            ElementaryFileId::Events => self.events.is_some(),
            ElementaryFileId::Faults => self.faults.is_some(),
            ElementaryFileId::DriverActivity => self.driver_activity.is_some(),
            ElementaryFileId::VehiclesUsed => self.vehicles_used.is_some(),
            ElementaryFileId::Places => self.places.is_some(),
            ElementaryFileId::CurrentUsage => self.current_usage.is_some(),
            ElementaryFileId::ControlActivity => self.control_activity.is_some(),
            ElementaryFileId::SpecificConditions => self.specific_conditions.is_some(),
            ElementaryFileId::VehicleUnitsUsed => self.vehicle_units_used.is_some(),
            ElementaryFileId::GnssPlaces => self.gnss_places.is_some(),
            ElementaryFileId::CardCertificate => self.card_certificate.is_some(),
            ElementaryFileId::CardSignCertificate => self.card_sign_certificate.is_some(),
            ElementaryFileId::CaCertificate => self.ca_certificate.is_some(),
            ElementaryFileId::LinkCertificate => self.link_certificate.is_some(),
            ElementaryFileId::Icc | ElementaryFileId::Ic | ElementaryFileId::Unknown(_) => false,
        }
    }

    /// Decode the value of a data block into its slot
    ///
    /// Returns `false` when the block has no slot here: a file of the other
    /// generation, a second block for a file already held, or an empty
    /// certificate file. The caller keeps such blocks raw.
    pub fn decode_file(&mut self, file: ElementaryFileId, value: &[u8]) -> TachoResult<bool> {
        if !self.supports(file) || self.contains(file) {
            return Ok(false);
        }
        if file.is_certificate() && value.iter().all(|&b| b == 0) {
            return Ok(false);
        }
        let version = self.version;
        let pointer = self.pointer_width(file);
        match file {
            ElementaryFileId::ApplicationIdentification => {
                self.application_identification = Some(DriverCardApplicationIdentification::decode(value, &version)?);
            }
            ElementaryFileId::ApplicationIdentificationV2 => {
                self.application_identification_v2 =
                    Some(DriverCardApplicationIdentificationV2::decode(value, &version)?);
            }
            ElementaryFileId::Identification => {
                self.identification = Some(DriverCardIdentification::decode(value, &version)?);
            }
            ElementaryFileId::CardDownload => self.card_download = Some(CardDownload::decode(value)?),
            ElementaryFileId::DrivingLicenceInfo => {
                self.driving_licence_info = Some(CardDrivingLicenceInformation::decode(value, &version)?);
            }
            ElementaryFileId::Events => self.events = Some(CyclicRecords::decode(value, pointer, &version)?),
            ElementaryFileId::Faults => self.faults = Some(CyclicRecords::decode(value, pointer, &version)?),
            ElementaryFileId::DriverActivity => self.driver_activity = Some(DriverActivityData::decode(value)?),
            ElementaryFileId::VehiclesUsed => {
                self.vehicles_used = Some(CyclicRecords::decode(value, pointer, &version)?);
            }
            ElementaryFileId::Places => self.places = Some(CyclicRecords::decode(value, pointer, &version)?),
            ElementaryFileId::CurrentUsage => self.current_usage = Some(CardCurrentUse::decode(value, &version)?),
            ElementaryFileId::ControlActivity => {
                self.control_activity = Some(CardControlActivityDataRecord::decode(value, &version)?);
            }
            ElementaryFileId::SpecificConditions => {
                self.specific_conditions = Some(CyclicRecords::decode(value, pointer, &version)?);
            }
            ElementaryFileId::VehicleUnitsUsed => {
                self.vehicle_units_used = Some(CyclicRecords::decode(value, pointer, &version)?);
            }
            ElementaryFileId::GnssPlaces => {
                self.gnss_places = Some(CyclicRecords::decode(value, pointer, &version)?);
            }
            ElementaryFileId::CardCertificate => self.card_certificate = Some(Certificate::decode(value, &version)?),
            ElementaryFileId::CardSignCertificate => {
                self.card_sign_certificate = Some(Certificate::decode(value, &version)?);
            }
            ElementaryFileId::CaCertificate => self.ca_certificate = Some(Certificate::decode(value, &version)?),
            ElementaryFileId::LinkCertificate => {
                self.link_certificate = Some(Certificate::decode(value, &version)?);
            }
            ElementaryFileId::Icc | ElementaryFileId::Ic | ElementaryFileId::Unknown(_) => return Ok(false),
        }
        Ok(true)
    }

    /// Encode the value of `file`, if held
    pub fn encode_file(&self, file: ElementaryFileId) -> TachoResult<Option<Vec<u8>>> {
        let version = &self.version;
        let pointer = self.pointer_width(file);
        let value = match file {
            ElementaryFileId::ApplicationIdentification => self
                .application_identification
                .as_ref()
                .map(|v| v.encode(version))
                .transpose()?,
            ElementaryFileId::ApplicationIdentificationV2 => self
                .application_identification_v2
                .as_ref()
                .map(|v| v.encode(version))
                .transpose()?,
            ElementaryFileId::Identification => self.identification.as_ref().map(|v| v.encode(version)).transpose()?,
            ElementaryFileId::CardDownload => self.card_download.as_ref().map(|v| v.encode()).transpose()?,
            ElementaryFileId::DrivingLicenceInfo => self
                .driving_licence_info
                .as_ref()
                .map(|v| v.encode(version))
                .transpose()?,
            ElementaryFileId::Events => self.events.as_ref().map(|v| v.encode(pointer, version)).transpose()?,
            ElementaryFileId::Faults => self.faults.as_ref().map(|v| v.encode(pointer, version)).transpose()?,
            ElementaryFileId::DriverActivity => self.driver_activity.as_ref().map(|v| v.encode()).transpose()?,
            ElementaryFileId::VehiclesUsed => self
                .vehicles_used
                .as_ref()
                .map(|v| v.encode(pointer, version))
                .transpose()?,
            ElementaryFileId::Places => self.places.as_ref().map(|v| v.encode(pointer, version)).transpose()?,
            ElementaryFileId::CurrentUsage => self.current_usage.as_ref().map(|v| v.encode(version)).transpose()?,
            ElementaryFileId::ControlActivity => self
                .control_activity
                .as_ref()
                .map(|v| v.encode(version))
                .transpose()?,
            ElementaryFileId::SpecificConditions => self
                .specific_conditions
                .as_ref()
                .map(|v| v.encode(pointer, version))
                .transpose()?,
            ElementaryFileId::VehicleUnitsUsed => self
                .vehicle_units_used
                .as_ref()
                .map(|v| v.encode(pointer, version))
                .transpose()?,
            ElementaryFileId::GnssPlaces => self
                .gnss_places
                .as_ref()
                .map(|v| v.encode(pointer, version))
                .transpose()?,
            ElementaryFileId::CardCertificate => self.card_certificate.as_ref().map(|c| c.raw().to_vec()),
            ElementaryFileId::CardSignCertificate => self.card_sign_certificate.as_ref().map(|c| c.raw().to_vec()),
            ElementaryFileId::CaCertificate => self.ca_certificate.as_ref().map(|c| c.raw().to_vec()),
            ElementaryFileId::LinkCertificate => self.link_certificate.as_ref().map(|c| c.raw().to_vec()),
            ElementaryFileId::Icc | ElementaryFileId::Ic | ElementaryFileId::Unknown(_) => None,
        };
        Ok(value)
    }

    /// Files held, certificates first, in dump order
    pub fn present_files(&self) -> Vec<ElementaryFileId> {
        ElementaryFileId::CERTIFICATE_FILES
            .iter()
            .chain(ElementaryFileId::APPLICATION_FILES.iter())
            .copied()
            .filter(|file| self.contains(*file))
            .collect()
    }

    pub fn signature(&self, file: ElementaryFileId) -> Option<&Bytes> {
        self.signatures
            .iter()
            .find(|s| s.file == file)
            .map(|s| &s.signature)
    }

    /// Store the signature of `file`, replacing an earlier one
    pub fn set_signature(&mut self, file: ElementaryFileId, signature: Bytes) {
        match self.signatures.iter_mut().find(|s| s.file == file) {
            Some(existing) => existing.signature = signature,
            None => self.signatures.push(BlockSignature { file, signature }),
        }
    }

    /// Verify the CA certificate with `root`, then the card certificates
    /// with the CA key
    ///
    /// Every verified certificate records its outcome. The first failure
    /// is returned after all card certificates have been tried.
    ///
    /// # Errors
    /// [`TachoError::MissingPublicKey`] when there is no CA certificate or
    /// no card certificate; the verification error otherwise.
    pub fn verify_certificates(&mut self, root: &PublicKey) -> TachoResult<()> {
        let generation = self.version.generation;
        let ca = self
            .ca_certificate
            .as_mut()
            .ok_or_else(|| TachoError::MissingPublicKey(format!("{} application has no CA certificate", generation)))?;
        log::trace!("verifying CA certificate {}", ca.authority_reference());
        ca.verify(root)?;
        let ca_key = ca.public_key()?;

        let mut first_error = None;
        let mut verified = 0;
        for certificate in [&mut self.card_certificate, &mut self.card_sign_certificate]
            .into_iter()
            .flatten()
        {
            log::trace!("verifying card certificate issued by {}", certificate.authority_reference());
            verified += 1;
            if let Err(e) = certificate.verify(&ca_key) {
                first_error.get_or_insert(e);
            }
        }
        if verified == 0 {
            return Err(TachoError::MissingPublicKey(format!(
                "{} application has no card certificate",
                generation
            )));
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop every record's originating bytes
    pub fn clear_raw_data(&mut self) {
        if let Some(v) = &mut self.application_identification {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.application_identification_v2 {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.identification {
            v.card.clear_raw_data();
            v.holder.clear_raw_data();
        }
        if let Some(v) = &mut self.driving_licence_info {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.events {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.faults {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.vehicles_used {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.places {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.current_usage {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.control_activity {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.specific_conditions {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.vehicle_units_used {
            v.clear_raw_data();
        }
        if let Some(v) = &mut self.gnss_places {
            v.clear_raw_data();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(seconds: u32) -> Vec<u8> {
        let mut data = seconds.to_be_bytes().to_vec();
        data.extend_from_slice(&[0x00, 0x0D, 0x00, 0x00, 0x00, 0x64]);
        data
    }

    #[test]
    fn test_gen1_places_have_one_byte_pointer() {
        let mut application = DriverCardApplication::new(Version::GEN1);
        let mut value = vec![0x01];
        value.extend(place(100));
        value.extend(place(200));
        assert!(application.decode_file(ElementaryFileId::Places, &value).unwrap());
        let places = application.places.as_ref().unwrap();
        assert_eq!(places.newest_record_pointer, Some(1));
        assert_eq!(places.records.len(), 2);
        assert_eq!(application.encode_file(ElementaryFileId::Places).unwrap(), Some(value));
    }

    #[test]
    fn test_second_block_for_same_file_is_refused() {
        let mut application = DriverCardApplication::new(Version::GEN1);
        let value = [0x5F, 0xEE, 0x66, 0x00];
        assert!(application.decode_file(ElementaryFileId::CardDownload, &value).unwrap());
        assert!(!application.decode_file(ElementaryFileId::CardDownload, &value).unwrap());
    }

    #[test]
    fn test_generation_2_files_refused_by_generation_1() {
        let mut application = DriverCardApplication::new(Version::GEN1);
        assert!(!application.decode_file(ElementaryFileId::GnssPlaces, &[0, 0]).unwrap());
        assert!(!application.decode_file(ElementaryFileId::Unknown(0x0599), &[]).unwrap());
        let mut application = DriverCardApplication::new(Version::GEN2);
        assert!(application.decode_file(ElementaryFileId::GnssPlaces, &[0, 0]).unwrap());
    }

    fn gen2_place(seconds: u32, authenticated: bool) -> Vec<u8> {
        let mut data = place(seconds);
        data.extend_from_slice(&[0x5F, 0xEE, 0x66, 0x00, 0x0C, 0x00, 0x14, 0x88, 0xFF, 0xFA, 0xC2]);
        if authenticated {
            data.push(0x01);
        }
        data
    }

    #[test]
    fn test_places_layout_follows_data_version() {
        let mut plain = vec![0x00, 0x00];
        plain.extend(gen2_place(100, false));
        let mut authenticated = vec![0x00, 0x00];
        authenticated.extend(gen2_place(100, true));

        let mut application = DriverCardApplication::new(Version::GEN2);
        assert!(application.decode_file(ElementaryFileId::Places, &authenticated).is_err());
        assert!(application.decode_file(ElementaryFileId::Places, &plain).unwrap());
        let record = &application.places.as_ref().unwrap().records[0];
        assert_eq!(record.entry_gnss_place_record.as_ref().unwrap().authentication_status, None);

        let mut application = DriverCardApplication::new(Version::GEN2_V2);
        assert!(application.decode_file(ElementaryFileId::Places, &plain).is_err());
        assert!(application.decode_file(ElementaryFileId::Places, &authenticated).unwrap());
        let record = &application.places.as_ref().unwrap().records[0];
        assert_eq!(
            record.entry_gnss_place_record.as_ref().unwrap().authentication_status,
            Some(tacho_core::enums::PositionAuthenticationStatus::Authenticated)
        );
        assert_eq!(application.encode_file(ElementaryFileId::Places).unwrap(), Some(authenticated));
    }

    #[test]
    fn test_v2_identification_keeps_context() {
        let mut application = DriverCardApplication::new(Version::GEN2);
        let value = [0x00, 0x07, 0x00, 0x3A, 0x00, 0x7C, 0x00, 0x3E, 0x03];
        assert!(application
            .decode_file(ElementaryFileId::ApplicationIdentificationV2, &value)
            .unwrap());
        assert_eq!(application.version, Version::GEN2);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut application = DriverCardApplication::new(Version::GEN1);
        assert!(application.decode_file(ElementaryFileId::CurrentUsage, &[0u8; 18]).is_err());
        assert!(!application.contains(ElementaryFileId::CurrentUsage));
    }

    #[test]
    fn test_zeroed_certificate_file_is_left_raw() {
        let mut application = DriverCardApplication::new(Version::GEN2);
        assert!(!application
            .decode_file(ElementaryFileId::LinkCertificate, &[0u8; 205])
            .unwrap());
    }

    #[test]
    fn test_signatures() {
        let mut application = DriverCardApplication::new(Version::GEN1);
        application.set_signature(ElementaryFileId::Places, Bytes::from_static(&[1, 2]));
        application.set_signature(ElementaryFileId::Places, Bytes::from_static(&[3]));
        assert_eq!(application.signatures.len(), 1);
        assert_eq!(application.signature(ElementaryFileId::Places).map(|s| s.as_ref()), Some(&[3u8][..]));
    }

    #[test]
    fn test_verify_without_ca_certificate() {
        let mut application = DriverCardApplication::new(Version::GEN2);
        let key = PublicKey::Rsa(tacho_security::RsaPublicKey::new(&[0x01; 128], &[0x01]).unwrap());
        assert!(matches!(
            application.verify_certificates(&key),
            Err(TachoError::MissingPublicKey(_))
        ));
    }
}
