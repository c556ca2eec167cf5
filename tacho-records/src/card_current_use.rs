//! CardCurrentUse

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::TimeReal;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

use crate::vehicle_registration::VehicleRegistrationIdentification;

/// Vehicle the card is currently inserted in
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardCurrentUse {
    pub session_open_time: Option<TimeReal>,
    pub session_open_vehicle: VehicleRegistrationIdentification,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl CardCurrentUse {
    pub const LENGTH: usize = 19;
}

impl Record for CardCurrentUse {
    const NAME: &'static str = "CardCurrentUse";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let session_open_time = reader.read_time_real()?;
        let session_open_vehicle = VehicleRegistrationIdentification::decode(
            reader.read_bytes(VehicleRegistrationIdentification::LENGTH)?,
            version,
        )?;
        reader.finish()?;
        Ok(Self {
            session_open_time,
            session_open_vehicle,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_time_real(self.session_open_time)?;
        canvas.paint(
            VehicleRegistrationIdentification::LENGTH,
            &self.session_open_vehicle.encode(version)?,
        )?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.session_open_vehicle.clear_raw_data();
    }
}
