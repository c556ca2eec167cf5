//! Tachograph data dictionary records
//!
//! One module per composite record of the card data dictionary. Every
//! record implements [`Record`]: it decodes from exactly its wire size and
//! encodes onto a canvas seeded from the bytes it was decoded from, so
//! reserved bits and padding survive a round trip untouched.
//!
//! Sizes that differ between generation 1 and generation 2 are chosen by
//! the [`Version`] threaded through `decode`/`encode`.

pub use tacho_core::error;
pub use tacho_core::{Record, TachoError, TachoResult, Version};

pub mod activity_change_info;
pub mod card_activity_daily_record;
pub mod card_control_activity_data_record;
pub mod card_current_use;
pub mod card_driving_licence_information;
pub mod card_event_record;
pub mod card_icc_identification;
pub mod card_identification;
pub mod card_number;
pub mod card_vehicle_record;
pub mod card_vehicle_unit_record;
pub mod driver_card_application_identification;
pub mod extended_serial_number;
pub mod gnss_accumulated_driving_record;
pub mod gnss_place_record;
pub mod place_record;
pub mod specific_condition_record;
pub mod vehicle_registration;

pub use activity_change_info::{ActivityChangeInfo, CardSlot, CardStatus, DrivingStatus, DriverActivity};
pub use card_activity_daily_record::CardActivityDailyRecord;
pub use card_control_activity_data_record::{CardControlActivityDataRecord, ControlType};
pub use card_current_use::CardCurrentUse;
pub use card_driving_licence_information::CardDrivingLicenceInformation;
pub use card_event_record::{CardEventRecord, CardFaultRecord};
pub use card_icc_identification::{CardChipIdentification, CardIccIdentification, EmbedderIcAssemblerId};
pub use card_identification::{CardIdentification, DriverCardHolderIdentification, NAME_LENGTH};
pub use card_number::{CardNumber, FullCardNumber};
pub use card_vehicle_record::CardVehicleRecord;
pub use card_vehicle_unit_record::CardVehicleUnitRecord;
pub use driver_card_application_identification::{
    DriverCardApplicationIdentification, DriverCardApplicationIdentificationV2,
};
pub use extended_serial_number::ExtendedSerialNumber;
pub use gnss_accumulated_driving_record::GnssAccumulatedDrivingRecord;
pub use gnss_place_record::GnssPlaceRecord;
pub use place_record::PlaceRecord;
pub use specific_condition_record::SpecificConditionRecord;
pub use vehicle_registration::VehicleRegistrationIdentification;
