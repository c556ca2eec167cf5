wire_enum! {
    /// Numerical reference to a country
    pub enum NationNumeric {
        NoInformation = 0x00,
        Austria = 0x01,
        Albania = 0x02,
        Andorra = 0x03,
        Armenia = 0x04,
        Azerbaijan = 0x05,
        Belgium = 0x06,
        Bulgaria = 0x07,
        BosniaAndHerzegovina = 0x08,
        Belarus = 0x09,
        Switzerland = 0x0A,
        Cyprus = 0x0B,
        CzechRepublic = 0x0C,
        Germany = 0x0D,
        Denmark = 0x0E,
        Spain = 0x0F,
        Estonia = 0x10,
        France = 0x11,
        Finland = 0x12,
        Liechtenstein = 0x13,
        FaroeIslands = 0x14,
        UnitedKingdom = 0x15,
        Georgia = 0x16,
        Greece = 0x17,
        Hungary = 0x18,
        Croatia = 0x19,
        Italy = 0x1A,
        Ireland = 0x1B,
        Iceland = 0x1C,
        Kazakhstan = 0x1D,
        Luxembourg = 0x1E,
        Lithuania = 0x1F,
        Latvia = 0x20,
        Malta = 0x21,
        Monaco = 0x22,
        Moldova = 0x23,
        NorthMacedonia = 0x24,
        Norway = 0x25,
        Netherlands = 0x26,
        Portugal = 0x27,
        Poland = 0x28,
        Romania = 0x29,
        SanMarino = 0x2A,
        RussianFederation = 0x2B,
        Sweden = 0x2C,
        Slovakia = 0x2D,
        Slovenia = 0x2E,
        Turkmenistan = 0x2F,
        Turkey = 0x30,
        Ukraine = 0x31,
        VaticanCity = 0x32,
        Yugoslavia = 0x33,
        Montenegro = 0x34,
        Serbia = 0x35,
        Uzbekistan = 0x36,
        Tajikistan = 0x37,
        EuropeanCommunity = 0xFD,
        RestOfEurope = 0xFE,
        RestOfTheWorld = 0xFF,
    }
}
