wire_enum! {
    /// Code identifying a specific condition
    pub enum SpecificConditionType {
        Rfu = 0x00,
        OutOfScopeBegin = 0x01,
        OutOfScopeEnd = 0x02,
        FerryTrainCrossingBegin = 0x03,
        FerryTrainCrossingEnd = 0x04,
    }
}
