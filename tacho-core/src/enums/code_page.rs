//! Code page selector of code-paged text fields

wire_enum! {
    /// Character set selector byte preceding `Name`, `Address` and
    /// registration-number payloads
    pub enum CodePage {
        /// Selector 0: no code page declared, read as ISO/IEC 8859-1
        Default = 0,
        Iso8859_1 = 1,
        Iso8859_2 = 2,
        Iso8859_3 = 3,
        Iso8859_4 = 4,
        Iso8859_5 = 5,
        Iso8859_6 = 6,
        Iso8859_7 = 7,
        Iso8859_8 = 8,
        Iso8859_9 = 9,
        Iso8859_10 = 10,
        Iso8859_11 = 11,
        Iso8859_13 = 13,
        Iso8859_14 = 14,
        Iso8859_15 = 15,
        Iso8859_16 = 16,
        Koi8R = 80,
        Koi8U = 85,
        /// Selector 255: field empty / not assigned
        Empty = 255,
    }
}
