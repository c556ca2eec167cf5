wire_enum! {
    /// Code explaining a daily work period entry in a place record
    pub enum EntryTypeDailyWorkPeriod {
        /// Begin, related time = card insertion time or time of entry
        Begin = 0,
        /// End, related time = card withdrawal time or time of entry
        End = 1,
        /// Begin, related time manually entered (start time)
        BeginManual = 2,
        /// End, related time manually entered (end of work period)
        EndManual = 3,
        /// Begin, related time assumed by VU
        BeginAssumed = 4,
        /// End, related time assumed by VU
        EndAssumed = 5,
    }
}
