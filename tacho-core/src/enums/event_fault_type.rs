wire_enum! {
    /// Qualification of an event or a fault
    pub enum EventFaultType {
        // General events
        NoFurtherDetails = 0x00,
        InsertionOfNonValidCard = 0x01,
        CardConflict = 0x02,
        TimeOverlap = 0x03,
        DrivingWithoutAppropriateCard = 0x04,
        CardInsertionWhileDriving = 0x05,
        LastCardSessionNotCorrectlyClosed = 0x06,
        OverSpeeding = 0x07,
        PowerSupplyInterruption = 0x08,
        MotionDataError = 0x09,
        VehicleMotionConflict = 0x0A,
        TimeConflict = 0x0B,
        CommunicationErrorWithRemoteFacility = 0x0C,
        AbsenceOfPositionInformation = 0x0D,
        CommunicationErrorWithExternalGnss = 0x0E,
        // Vehicle unit related security breach attempts
        VuSecurityBreachNoFurtherDetails = 0x10,
        MotionSensorAuthenticationFailure = 0x11,
        TachographCardAuthenticationFailure = 0x12,
        UnauthorisedChangeOfMotionSensor = 0x13,
        CardDataInputIntegrityError = 0x14,
        StoredUserDataIntegrityError = 0x15,
        InternalDataTransferError = 0x16,
        UnauthorisedCaseOpening = 0x17,
        HardwareSabotage = 0x18,
        TamperDetectionOfGnss = 0x19,
        ExternalGnssAuthenticationFailure = 0x1A,
        ExternalGnssCertificateExpired = 0x1B,
        // Sensor related security breach attempts
        SensorSecurityBreachNoFurtherDetails = 0x20,
        SensorAuthenticationFailure = 0x21,
        SensorStoredDataIntegrityError = 0x22,
        SensorInternalDataTransferError = 0x23,
        SensorUnauthorisedCaseOpening = 0x24,
        SensorHardwareSabotage = 0x25,
        // Recording equipment faults
        RecordingEquipmentFaultNoFurtherDetails = 0x30,
        VuInternalFault = 0x31,
        PrinterFault = 0x32,
        DisplayFault = 0x33,
        DownloadingFault = 0x34,
        SensorFault = 0x35,
        InternalGnssReceiverFault = 0x36,
        ExternalGnssFacilityFault = 0x37,
        RemoteCommunicationFacilityFault = 0x38,
        ItsInterfaceFault = 0x39,
        // Card faults
        CardFaultNoFurtherDetails = 0x40,
    }
}

impl EventFaultType {
    /// Whether the code lies in one of the fault ranges (0x30..=0x4F)
    pub fn is_fault(&self) -> bool {
        use crate::enums::WireEnum;
        match self.to_wire() {
            Ok(code) => (0x30..=0x4F).contains(&code),
            Err(_) => false,
        }
    }
}
