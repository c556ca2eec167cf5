//! DriverCardApplicationIdentification (generation 1 and 2) and the
//! version 2 extension

use serde::{Deserialize, Serialize};
use tacho_core::enums::EquipmentType;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoError, TachoResult, Version};

/// Capacities of the driver card application
///
/// The counts size the cyclic files of the application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DriverCardApplicationIdentification {
    pub type_of_tachograph_card_id: EquipmentType,
    pub card_structure_version: [u8; 2],
    pub no_of_events_per_type: u8,
    pub no_of_faults_per_type: u8,
    /// Size of the activity cyclic buffer in bytes
    pub activity_structure_length: u16,
    pub no_of_card_vehicle_records: u16,
    /// One byte in generation 1, two in generation 2
    pub no_of_card_place_records: u16,
    pub no_of_gnss_ad_records: Option<u16>,
    pub no_of_specific_condition_records: Option<u16>,
    pub no_of_card_vehicle_unit_records: Option<u16>,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl DriverCardApplicationIdentification {
    pub const GEN1_LENGTH: usize = 10;
    pub const GEN2_LENGTH: usize = 17;
}

impl Record for DriverCardApplicationIdentification {
    const NAME: &'static str = "DriverCardApplicationIdentification";
    const GENERATION_DEPENDENT: bool = true;

    fn size(version: &Version) -> usize {
        if version.is_gen2() {
            Self::GEN2_LENGTH
        } else {
            Self::GEN1_LENGTH
        }
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::size(version))?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let type_of_tachograph_card_id = reader.read_enum()?;
        let card_structure_version = reader.read_array()?;
        let no_of_events_per_type = reader.read_u8()?;
        let no_of_faults_per_type = reader.read_u8()?;
        let activity_structure_length = reader.read_u16()?;
        let no_of_card_vehicle_records = reader.read_u16()?;
        let mut identification = Self {
            type_of_tachograph_card_id,
            card_structure_version,
            no_of_events_per_type,
            no_of_faults_per_type,
            activity_structure_length,
            no_of_card_vehicle_records,
            raw_data: Some(data.to_vec()),
            ..Default::default()
        };
        if version.is_gen2() {
            identification.no_of_card_place_records = reader.read_u16()?;
            identification.no_of_gnss_ad_records = Some(reader.read_u16()?);
            identification.no_of_specific_condition_records = Some(reader.read_u16()?);
            identification.no_of_card_vehicle_unit_records = Some(reader.read_u16()?);
        } else {
            identification.no_of_card_place_records = u16::from(reader.read_u8()?);
        }
        reader.finish()?;
        Ok(identification)
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::size(version), self.raw_data.as_deref());
        canvas.paint_enum(&self.type_of_tachograph_card_id)?;
        canvas.paint_bytes(&self.card_structure_version)?;
        canvas.paint_u8(self.no_of_events_per_type)?;
        canvas.paint_u8(self.no_of_faults_per_type)?;
        canvas.paint_u16(self.activity_structure_length)?;
        canvas.paint_u16(self.no_of_card_vehicle_records)?;
        if version.is_gen2() {
            canvas.paint_u16(self.no_of_card_place_records)?;
            canvas.paint_u16(self.no_of_gnss_ad_records.unwrap_or(0))?;
            canvas.paint_u16(self.no_of_specific_condition_records.unwrap_or(0))?;
            canvas.paint_u16(self.no_of_card_vehicle_unit_records.unwrap_or(0))?;
        } else {
            let places = u8::try_from(self.no_of_card_place_records).map_err(|_| TachoError::ValueTooLarge {
                context: Self::NAME,
                message: format!(
                    "{} place records do not fit a generation 1 count",
                    self.no_of_card_place_records
                ),
            })?;
            canvas.paint_u8(places)?;
        }
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
    }
}

/// Capacities added by the version 2 driver card application
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DriverCardApplicationIdentificationV2 {
    pub length_of_following_data: u16,
    pub no_of_border_crossing_records: u16,
    pub no_of_load_unload_records: u16,
    pub no_of_load_type_entry_records: u16,
    pub vu_configuration_length_range: u8,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl DriverCardApplicationIdentificationV2 {
    pub const LENGTH: usize = 9;
}

impl Record for DriverCardApplicationIdentificationV2 {
    const NAME: &'static str = "DriverCardApplicationIdentificationV2";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let length_of_following_data = reader.read_u16()?;
        let no_of_border_crossing_records = reader.read_u16()?;
        let no_of_load_unload_records = reader.read_u16()?;
        let no_of_load_type_entry_records = reader.read_u16()?;
        let vu_configuration_length_range = reader.read_u8()?;
        reader.finish()?;
        Ok(Self {
            length_of_following_data,
            no_of_border_crossing_records,
            no_of_load_unload_records,
            no_of_load_type_entry_records,
            vu_configuration_length_range,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_u16(self.length_of_following_data)?;
        canvas.paint_u16(self.no_of_border_crossing_records)?;
        canvas.paint_u16(self.no_of_load_unload_records)?;
        canvas.paint_u16(self.no_of_load_type_entry_records)?;
        canvas.paint_u8(self.vu_configuration_length_range)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
    }
}
