//! ActivityChangeInfo
//!
//! Two bytes, bit-packed `s c p aa ttttttttttt` from the most significant
//! bit: slot, driving status, card status, activity, and the minute of the
//! day at which the change took effect.

use serde::{Deserialize, Serialize};
use std::fmt;
use tacho_core::error::expect_length;
use tacho_core::{Record, TachoError, TachoResult, Version};

/// Slot the card occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardSlot {
    #[default]
    Driver,
    CoDriver,
}

/// Single or crew driving
///
/// When the card was not inserted, the same bit tells whether the activity
/// is known (`Crew`) or unknown (`Single`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrivingStatus {
    #[default]
    Single,
    Crew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardStatus {
    #[default]
    Inserted,
    NotInserted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriverActivity {
    #[default]
    BreakRest,
    Availability,
    Work,
    Driving,
}

impl DriverActivity {
    fn from_bits(bits: u16) -> Self {
        match bits & 0x03 {
            0 => DriverActivity::BreakRest,
            1 => DriverActivity::Availability,
            2 => DriverActivity::Work,
            _ => DriverActivity::Driving,
        }
    }

    fn to_bits(self) -> u16 {
        match self {
            DriverActivity::BreakRest => 0,
            DriverActivity::Availability => 1,
            DriverActivity::Work => 2,
            DriverActivity::Driving => 3,
        }
    }
}

/// One change of activity within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActivityChangeInfo {
    pub slot: CardSlot,
    pub driving_status: DrivingStatus,
    pub card_status: CardStatus,
    pub activity: DriverActivity,
    /// Minutes since 00:00 UTC
    pub time_of_change: u16,
}

impl ActivityChangeInfo {
    pub const LENGTH: usize = 2;
    /// Largest value the 11-bit time field can hold
    pub const MAX_TIME: u16 = 0x07FF;

    pub fn from_u16(value: u16) -> Self {
        Self {
            slot: if value & 0x8000 != 0 { CardSlot::CoDriver } else { CardSlot::Driver },
            driving_status: if value & 0x4000 != 0 {
                DrivingStatus::Crew
            } else {
                DrivingStatus::Single
            },
            card_status: if value & 0x2000 != 0 {
                CardStatus::NotInserted
            } else {
                CardStatus::Inserted
            },
            activity: DriverActivity::from_bits(value >> 11),
            time_of_change: value & Self::MAX_TIME,
        }
    }

    /// # Errors
    /// [`TachoError::ValueTooLarge`] when the time does not fit in 11 bits.
    pub fn to_u16(&self) -> TachoResult<u16> {
        if self.time_of_change > Self::MAX_TIME {
            return Err(TachoError::ValueTooLarge {
                context: Self::NAME,
                message: format!("time of change {} exceeds 11 bits", self.time_of_change),
            });
        }
        let mut value = self.time_of_change;
        value |= self.activity.to_bits() << 11;
        if self.card_status == CardStatus::NotInserted {
            value |= 0x2000;
        }
        if self.driving_status == DrivingStatus::Crew {
            value |= 0x4000;
        }
        if self.slot == CardSlot::CoDriver {
            value |= 0x8000;
        }
        Ok(value)
    }
}

impl Record for ActivityChangeInfo {
    const NAME: &'static str = "ActivityChangeInfo";

    fn size(_version: &Version) -> usize {
        Self::LENGTH
    }

    fn decode(data: &[u8], _version: &Version) -> TachoResult<Self> {
        expect_length(Self::NAME, data, Self::LENGTH)?;
        Ok(Self::from_u16(u16::from_be_bytes([data[0], data[1]])))
    }

    fn encode(&self, _version: &Version) -> TachoResult<Vec<u8>> {
        Ok(self.to_u16()?.to_be_bytes().to_vec())
    }
}

impl fmt::Display for ActivityChangeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {:?}",
            self.time_of_change / 60,
            self.time_of_change % 60,
            self.activity
        )
    }
}
