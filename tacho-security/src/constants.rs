//! Tachograph security constants
//!
//! Object identifiers of the six standardised curves, and the fixed sizes of
//! the generation 1 RSA structures.

/// brainpoolP256r1
///
/// OID: {1, 3, 36, 3, 3, 2, 8, 1, 1, 7}
pub const BRAINPOOL_P256R1: &[u32] = &[1, 3, 36, 3, 3, 2, 8, 1, 1, 7];

/// brainpoolP384r1
///
/// OID: {1, 3, 36, 3, 3, 2, 8, 1, 1, 11}
pub const BRAINPOOL_P384R1: &[u32] = &[1, 3, 36, 3, 3, 2, 8, 1, 1, 11];

/// brainpoolP512r1
///
/// OID: {1, 3, 36, 3, 3, 2, 8, 1, 1, 13}
pub const BRAINPOOL_P512R1: &[u32] = &[1, 3, 36, 3, 3, 2, 8, 1, 1, 13];

/// NIST P-256 (secp256r1)
///
/// OID: {1, 2, 840, 10045, 3, 1, 7}
pub const NIST_P256: &[u32] = &[1, 2, 840, 10045, 3, 1, 7];

/// NIST P-384 (secp384r1)
///
/// OID: {1, 3, 132, 0, 34}
pub const NIST_P384: &[u32] = &[1, 3, 132, 0, 34];

/// NIST P-521 (secp521r1)
///
/// OID: {1, 3, 132, 0, 35}
pub const NIST_P521: &[u32] = &[1, 3, 132, 0, 35];

/// Generation 1 certificate: signature 128 + Cn' 58 + CAR 8
pub const RSA_CERTIFICATE_LENGTH: usize = 194;

/// RSA modulus length of every generation 1 key
pub const RSA_MODULUS_LENGTH: usize = 128;

/// RSA public exponent length as stored in certificates and root keys
pub const RSA_EXPONENT_LENGTH: usize = 8;

/// Non-recoverable certificate content Cn'
pub const RSA_NON_RECOVERABLE_LENGTH: usize = 58;

/// Recoverable certificate content Cr'
pub const RSA_RECOVERABLE_LENGTH: usize = 106;

/// Recovered message header byte
pub const RSA_RECOVERY_HEADER: u8 = 0x6A;

/// Recovered message trailer byte
pub const RSA_RECOVERY_TRAILER: u8 = 0xBC;

/// European root public key: CAR 8 + modulus 128 + exponent 8
pub const RSA_ROOT_KEY_LENGTH: usize = 144;

/// Smallest generation 2 certificate
pub const ECC_CERTIFICATE_MIN_LENGTH: usize = 204;

/// Largest generation 2 certificate
pub const ECC_CERTIFICATE_MAX_LENGTH: usize = 341;

/// Certificate reference length (CAR, CHR)
pub const KEY_IDENTIFIER_LENGTH: usize = 8;

/// Certificate holder authorisation length
pub const HOLDER_AUTHORISATION_LENGTH: usize = 7;
