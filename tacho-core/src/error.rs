use thiserror::Error;

/// Main error type for tachograph codec operations
///
/// Every variant carries enough context (field name, expected vs. actual
/// length, offending byte) to localise the failing record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TachoError {
    #[error("{context}: insufficient data, need {expected} bytes, got {actual}")]
    InsufficientData {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{context}: invalid length, expected {expected} bytes, got {actual}")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{context}: invalid BCD byte 0x{byte:02X}")]
    InvalidBcd { context: &'static str, byte: u8 },

    #[error("{context}: unrecognized discriminant 0x{value:02X}")]
    UnknownDiscriminant { context: &'static str, value: u32 },

    #[error("{context}: {message}")]
    ValueTooLarge {
        context: &'static str,
        message: String,
    },

    #[error("{context}: value has no wire code")]
    NoWireCode { context: &'static str },

    #[error("{context}: cannot determine generation")]
    UnknownGeneration { context: &'static str },

    #[error("Malformed ASN.1: {0}")]
    MalformedAsn1(String),

    #[error("Unsupported curve or OID: {0}")]
    UnsupportedCurve(String),

    #[error("Certificate length {actual} outside {min}..={max}")]
    CertificateLength { actual: usize, min: usize, max: usize },

    #[error("Missing public key material: {0}")]
    MissingPublicKey(String),

    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl TachoError {
    /// Whether the error belongs to the certificate/signature family
    pub fn is_cryptographic(&self) -> bool {
        matches!(
            self,
            TachoError::MalformedAsn1(_)
                | TachoError::UnsupportedCurve(_)
                | TachoError::CertificateLength { .. }
                | TachoError::MissingPublicKey(_)
                | TachoError::SignatureMismatch(_)
        )
    }
}

/// Result type alias for tachograph codec operations
pub type TachoResult<T> = Result<T, TachoError>;

/// Fail with [`TachoError::InvalidLength`] unless `data` is exactly `expected` bytes
pub fn expect_length(context: &'static str, data: &[u8], expected: usize) -> TachoResult<()> {
    if data.len() != expected {
        return Err(TachoError::InvalidLength {
            context,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Fail with [`TachoError::InsufficientData`] unless `data` holds at least `expected` bytes
pub fn expect_at_least(context: &'static str, data: &[u8], expected: usize) -> TachoResult<()> {
    if data.len() < expected {
        return Err(TachoError::InsufficientData {
            context,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}
