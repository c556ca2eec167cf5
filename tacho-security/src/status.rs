//! Outcome of a signature verification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature verification outcome recorded on a certificate
///
/// Starts as `Unverified`; only a verification call moves it to `Valid` or
/// `Invalid`, and a later call overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignatureStatus {
    #[default]
    Unverified,
    Valid,
    Invalid,
}

impl SignatureStatus {
    /// `true` only after a successful verification
    pub fn is_valid(&self) -> bool {
        matches!(self, SignatureStatus::Valid)
    }

    /// Whether a verification has run
    pub fn is_verified(&self) -> bool {
        !matches!(self, SignatureStatus::Unverified)
    }

    /// `None` before verification, otherwise the outcome
    pub fn outcome(&self) -> Option<bool> {
        match self {
            SignatureStatus::Unverified => None,
            SignatureStatus::Valid => Some(true),
            SignatureStatus::Invalid => Some(false),
        }
    }

    pub(crate) fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            SignatureStatus::Valid
        } else {
            SignatureStatus::Invalid
        }
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureStatus::Unverified => write!(f, "unverified"),
            SignatureStatus::Valid => write!(f, "valid"),
            SignatureStatus::Invalid => write!(f, "invalid"),
        }
    }
}
