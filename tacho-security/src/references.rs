//! Certificate references
//!
//! Both references are 8-byte key identifiers. They are kept as their own
//! types over the full 64-bit value so that an authority reference cannot be
//! passed where a holder reference is expected, and nothing is truncated.

use crate::constants::KEY_IDENTIFIER_LENGTH;
use serde::{Deserialize, Serialize};
use std::fmt;
use tacho_core::enums::{NationNumeric, WireEnum};
use tacho_core::error::{expect_length, TachoResult};

macro_rules! key_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const LENGTH: usize = KEY_IDENTIFIER_LENGTH;

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub fn from_bytes(bytes: [u8; 8]) -> Self {
                Self(u64::from_be_bytes(bytes))
            }

            /// Decode from exactly 8 bytes
            pub fn decode(data: &[u8]) -> TachoResult<Self> {
                expect_length(stringify!($name), data, Self::LENGTH)?;
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(data);
                Ok(Self::from_bytes(bytes))
            }

            pub fn to_bytes(&self) -> [u8; 8] {
                self.0.to_be_bytes()
            }

            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:016X}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

key_identifier! {
    /// Certificate Authority Reference (CAR): names the key that signed a
    /// certificate
    ///
    /// Layout of an authority key identifier: nation numeric 1, nation
    /// alpha 3, key serial number 1, additional info 2, CA identifier 1.
    CertificateAuthorityReference
}

key_identifier! {
    /// Certificate Holder Reference (CHR): names the key a certificate
    /// carries
    CertificateHolderReference
}

impl CertificateAuthorityReference {
    /// Issuing member state
    pub fn nation_numeric(&self) -> NationNumeric {
        NationNumeric::from_wire(self.to_bytes()[0])
    }

    /// Three-letter nation code, trailing spaces removed
    pub fn nation_alpha(&self) -> String {
        let bytes = self.to_bytes();
        String::from_utf8_lossy(&bytes[1..4]).trim_end().to_string()
    }

    pub fn key_serial_number(&self) -> u8 {
        self.to_bytes()[4]
    }

    pub fn additional_info(&self) -> u16 {
        let bytes = self.to_bytes();
        u16::from_be_bytes([bytes[5], bytes[6]])
    }

    pub fn ca_identifier(&self) -> u8 {
        self.to_bytes()[7]
    }

    /// Whether `holder` names the same key
    pub fn refers_to(&self, holder: &CertificateHolderReference) -> bool {
        self.0 == holder.0
    }
}

impl CertificateHolderReference {
    /// Reference this key as the authority of certificates it signs
    pub fn as_authority(&self) -> CertificateAuthorityReference {
        CertificateAuthorityReference(self.0)
    }
}
