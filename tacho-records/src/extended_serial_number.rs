//! ExtendedSerialNumber

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::MonthYear;
use tacho_core::enums::EquipmentType;
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoResult, Version};

/// Unique serial number of a piece of equipment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtendedSerialNumber {
    pub serial_number: u32,
    /// Month and year of manufacture
    pub month_year: MonthYear,
    pub equipment_type: EquipmentType,
    pub manufacturer_code: u8,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl ExtendedSerialNumber {
    pub const LENGTH: usize = 8;

    pub fn new(serial_number: u32, month_year: MonthYear, equipment_type: EquipmentType, manufacturer_code: u8) -> Self {
        Self {
            serial_number,
            month_year,
            equipment_type,
            manufacturer_code,
            raw_data: None,
        }
    }
}

impl Record for ExtendedSerialNumber {
    const NAME: &'static str = "ExtendedSerialNumber";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        let mut reader = RecordReader::new(Self::NAME, data);
        let serial_number = reader.read_u32()?;
        let month_year = MonthYear::decode(reader.read_bytes(MonthYear::LENGTH)?)?;
        let equipment_type = reader.read_enum()?;
        let manufacturer_code = reader.read_u8()?;
        reader.finish()?;
        Ok(Self {
            serial_number,
            month_year,
            equipment_type,
            manufacturer_code,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        let mut canvas = Canvas::new(Self::NAME, Self::LENGTH, self.raw_data.as_deref());
        canvas.paint_u32(self.serial_number)?;
        canvas.paint(MonthYear::LENGTH, &self.month_year.encode()?)?;
        canvas.paint_enum(&self.equipment_type)?;
        canvas.paint_u8(self.manufacturer_code)?;
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
    }
}
