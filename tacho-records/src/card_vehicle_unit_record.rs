//! CardVehicleUnitRecord

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{Ia5String, TimeReal};
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

/// Vehicle unit the card was inserted in
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardVehicleUnitRecord {
    pub time_stamp: Option<TimeReal>,
    pub manufacturer_code: u8,
    pub device_id: u8,
    pub vu_software_version: Ia5String,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl CardVehicleUnitRecord {
    pub const LENGTH: usize = 10;
    pub const SOFTWARE_VERSION_LENGTH: usize = 4;
}

impl Record for CardVehicleUnitRecord {
    const NAME: &'static str = "CardVehicleUnitRecord";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let time_stamp = reader.read_time_real()?;
        let manufacturer_code = reader.read_u8()?;
        let device_id = reader.read_u8()?;
        let vu_software_version = Ia5String::decode(reader.read_bytes(Self::SOFTWARE_VERSION_LENGTH)?);
        reader.finish()?;
        Ok(Self {
            time_stamp,
            manufacturer_code,
            device_id,
            vu_software_version,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_time_real(self.time_stamp)?;
        canvas.paint_u8(self.manufacturer_code)?;
        canvas.paint_u8(self.device_id)?;
        canvas.paint(
            Self::SOFTWARE_VERSION_LENGTH,
            &self.vu_software_version.encode(Self::SOFTWARE_VERSION_LENGTH)?,
        )?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.vu_software_version.clear_raw();
    }
}
