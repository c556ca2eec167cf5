wire_enum! {
    /// Whether a GNSS position came from an authenticated navigation message
    pub enum PositionAuthenticationStatus {
        NotAuthenticated = 0,
        Authenticated = 1,
    }
}
