//! CardVehicleRecord

use serde::{Deserialize, Serialize};
use tacho_core::datatypes::{decode_bcd, encode_bcd, Ia5String, OdometerShort, TimeReal};
use tacho_core::error::expect_length;
use tacho_core::{Canvas, Record, RecordReader, TachoError, TachoResult, Version};

use crate::vehicle_registration::VehicleRegistrationIdentification;

/// Period of use of one vehicle with this card
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardVehicleRecord {
    pub vehicle_odometer_begin: OdometerShort,
    pub vehicle_odometer_end: OdometerShort,
    pub vehicle_first_use: Option<TimeReal>,
    pub vehicle_last_use: Option<TimeReal>,
    pub vehicle_registration: VehicleRegistrationIdentification,
    /// Value of the VU download counter at the last card withdrawal; 4 BCD digits
    pub vu_data_block_counter: u16,
    /// Generation 2 only
    pub vehicle_identification_number: Option<Ia5String>,
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    raw_data: Option<Vec<u8>>,
}

impl CardVehicleRecord {
    pub const GEN1_LENGTH: usize = 31;
    pub const GEN2_LENGTH: usize = 48;
    pub const VIN_LENGTH: usize = 17;

    /// Distance covered during the period of use
    pub fn distance(&self) -> u32 {
        self.vehicle_odometer_begin.distance_to(self.vehicle_odometer_end)
    }
}

impl Record for CardVehicleRecord {
    const NAME: &'static str = "CardVehicleRecord";
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
        let vehicle_odometer_begin = OdometerShort::decode(reader.read_bytes(OdometerShort::LENGTH)?)?;
        let vehicle_odometer_end = OdometerShort::decode(reader.read_bytes(OdometerShort::LENGTH)?)?;
        let vehicle_first_use = reader.read_time_real()?;
        let vehicle_last_use = reader.read_time_real()?;
        let vehicle_registration = VehicleRegistrationIdentification::decode(
            reader.read_bytes(VehicleRegistrationIdentification::LENGTH)?,
            version,
        )?;
        let vu_data_block_counter = decode_bcd(reader.read_bytes(2)?)? as u16;
        let vehicle_identification_number = if version.is_gen2() {
            Some(Ia5String::decode(reader.read_bytes(Self::VIN_LENGTH)?))
        } else {
            None
        };
        reader.finish()?;
        Ok(Self {
            vehicle_odometer_begin,
            vehicle_odometer_end,
            vehicle_first_use,
            vehicle_last_use,
            vehicle_registration,
            vu_data_block_counter,
            vehicle_identification_number,
            raw_data: Some(data.to_vec()),
        })
    }

    fn encode(&self, version: &Version) -> TachoResult<Vec<u8>> {
        if !version.is_gen2() && self.vehicle_identification_number.is_some() {
            return Err(TachoError::InvalidData(
                "CardVehicleRecord: VIN cannot be encoded in a generation 1 record".to_string(),
            ));
        }
        let mut canvas = Canvas::new(Self::NAME, Self::size(version), self.raw_data.as_deref());
        canvas.paint(OdometerShort::LENGTH, &self.vehicle_odometer_begin.encode()?)?;
        canvas.paint(OdometerShort::LENGTH, &self.vehicle_odometer_end.encode()?)?;
        canvas.paint_time_real(self.vehicle_first_use)?;
        canvas.paint_time_real(self.vehicle_last_use)?;
        canvas.paint(
            VehicleRegistrationIdentification::LENGTH,
            &self.vehicle_registration.encode(version)?,
        )?;
        canvas.paint(2, &encode_bcd(u64::from(self.vu_data_block_counter), 2)?)?;
        if version.is_gen2() {
            match &self.vehicle_identification_number {
                Some(vin) => canvas.paint(Self::VIN_LENGTH, &vin.encode(Self::VIN_LENGTH)?)?,
                None => canvas.paint(Self::VIN_LENGTH, &[0u8; Self::VIN_LENGTH])?,
            }
        }
        canvas.finish()
    }

    fn clear_raw_data(&mut self) {
        self.raw_data = None;
        self.vehicle_registration.clear_raw_data();
        if let Some(vin) = &mut self.vehicle_identification_number {
            vin.clear_raw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::enums::NationNumeric;

    fn gen1_bytes() -> Vec<u8> {
        let mut data = vec![0x01, 0xE2, 0x40, 0x01, 0xE3, 0x1C];
        data.extend_from_slice(&[0x5F, 0xEE, 0x66, 0x00]);
        data.extend_from_slice(&[0x5F, 0xEE, 0xA3, 0x40]);
        data.extend_from_slice(&[0x0D, 0x01]);
        data.extend_from_slice(b"B-TC 1234    ");
        data.extend_from_slice(&[0x12, 0x34]);
        data
    }

    #[test]
    fn test_gen1_vehicle() {
        let record = CardVehicleRecord::decode(&gen1_bytes(), &Version::GEN1).unwrap();
        assert_eq!(record.vehicle_odometer_begin.km(), 123_456);
        assert_eq!(record.distance(), 220);
        assert_eq!(record.vehicle_registration.nation, NationNumeric::Germany);
        assert_eq!(record.vu_data_block_counter, 1234);
        assert!(record.vehicle_identification_number.is_none());
        assert_eq!(record.encode(&Version::GEN1).unwrap(), gen1_bytes());
    }

    #[test]
    fn test_gen2_vehicle_has_vin() {
        let mut data = gen1_bytes();
        data.extend_from_slice(b"WDB9634031L123456");
        let record = CardVehicleRecord::decode(&data, &Version::GEN2).unwrap();
        assert_eq!(
            record.vehicle_identification_number.as_ref().map(|v| v.value()),
            Some("WDB9634031L123456")
        );
        assert_eq!(record.encode(&Version::GEN2).unwrap(), data);
    }

    #[test]
    fn test_counter_must_be_bcd() {
        let mut data = gen1_bytes();
        data[29] = 0xAB;
        assert!(matches!(
            CardVehicleRecord::decode(&data, &Version::GEN1),
            Err(TachoError::InvalidBcd { byte: 0xAB, .. })
        ));
    }

    #[test]
    fn test_gen1_rejects_vin() {
        let mut record = CardVehicleRecord::decode(&gen1_bytes(), &Version::GEN1).unwrap();
        record.vehicle_identification_number = Some(Ia5String::new("WDB9634031L123456"));
        assert!(record.encode(&Version::GEN1).is_err());
    }
}
