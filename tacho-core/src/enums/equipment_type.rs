wire_enum! {
    /// Type of tachograph equipment (also the card type of a `FullCardNumber`)
    pub enum EquipmentType {
        Reserved = 0,
        DriverCard = 1,
        WorkshopCard = 2,
        ControlCard = 3,
        CompanyCard = 4,
        ManufacturingCard = 5,
        VehicleUnit = 6,
        MotionSensor = 7,
        GnssFacility = 8,
        RemoteCommunicationFacility = 9,
        ItsInterfaceModule = 10,
        Plaque = 11,
        M1N1Adapter = 12,
        EuropeanRootCa = 13,
        MemberStateCa = 14,
        ExternalGnssConnection = 15,
    }
}

impl EquipmentType {
    /// Whether this equipment type is a tachograph card
    pub fn is_card(&self) -> bool {
        matches!(
            self,
            EquipmentType::DriverCard
                | EquipmentType::WorkshopCard
                | EquipmentType::ControlCard
                | EquipmentType::CompanyCard
        )
    }
}
