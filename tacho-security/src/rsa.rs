//! RSA keys and signature recovery (generation 1)

use crate::constants::{RSA_EXPONENT_LENGTH, RSA_MODULUS_LENGTH, RSA_ROOT_KEY_LENGTH};
use crate::references::CertificateAuthorityReference;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tacho_core::error::{expect_length, TachoError, TachoResult};

/// RSA public key: modulus and public exponent, big-endian
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicKey {
    #[serde(with = "serde_bytes")]
    modulus: Vec<u8>,
    #[serde(with = "serde_bytes")]
    exponent: Vec<u8>,
}

impl RsaPublicKey {
    /// Create from modulus and exponent bytes
    ///
    /// # Error Handling
    /// [`TachoError::MissingPublicKey`] when either part is zero.
    pub fn new(modulus: &[u8], exponent: &[u8]) -> TachoResult<Self> {
        if modulus.iter().all(|&b| b == 0) || exponent.iter().all(|&b| b == 0) {
            return Err(TachoError::MissingPublicKey(
                "RSA modulus or exponent is zero".to_string(),
            ));
        }
        Ok(Self {
            modulus: modulus.to_vec(),
            exponent: exponent.to_vec(),
        })
    }

    /// Decode `n (128) || e (8)`
    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_length(
            "RsaPublicKey",
            data,
            RSA_MODULUS_LENGTH + RSA_EXPONENT_LENGTH,
        )?;
        let (modulus, exponent) = data.split_at(RSA_MODULUS_LENGTH);
        Self::new(modulus, exponent)
    }

    /// Encode `n || e`
    pub fn encode(&self) -> Vec<u8> {
        let mut result = self.modulus.clone();
        result.extend_from_slice(&self.exponent);
        result
    }

    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    pub fn exponent(&self) -> &[u8] {
        &self.exponent
    }

    /// Raise `signature` to the public exponent modulo the modulus
    ///
    /// The result is left-padded to the modulus length.
    ///
    /// # Error Handling
    /// [`TachoError::SignatureMismatch`] when the signature is not the
    /// modulus length or not smaller than the modulus.
    pub fn recover(&self, signature: &[u8]) -> TachoResult<Vec<u8>> {
        let size = self.modulus.len();
        if signature.len() != size {
            return Err(TachoError::SignatureMismatch(format!(
                "signature has {} bytes, modulus {}",
                signature.len(),
                size
            )));
        }
        let n = BigUint::from_bytes_be(&self.modulus);
        let e = BigUint::from_bytes_be(&self.exponent);
        let s = BigUint::from_bytes_be(signature);
        if n.is_zero() || s >= n {
            return Err(TachoError::SignatureMismatch(
                "signature is not smaller than the modulus".to_string(),
            ));
        }
        let message = s.modpow(&e, &n).to_bytes_be();
        let mut result = vec![0u8; size - message.len()];
        result.extend_from_slice(&message);
        Ok(result)
    }
}

/// European root public key: the trust anchor of generation 1 chains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaRootKey {
    pub reference: CertificateAuthorityReference,
    pub key: RsaPublicKey,
}

impl RsaRootKey {
    /// Decode `CAR (8) || n (128) || e (8)`
    pub fn decode(data: &[u8]) -> TachoResult<Self> {
        expect_length("RsaRootKey", data, RSA_ROOT_KEY_LENGTH)?;
        let reference = CertificateAuthorityReference::decode(&data[..8])?;
        let key = RsaPublicKey::decode(&data[8..])?;
        Ok(Self { reference, key })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut result = self.reference.to_bytes().to_vec();
        result.extend(self.key.encode());
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ::rsa::traits::{PrivateKeyParts, PublicKeyParts};

    /// Throw-away 1024-bit key with its private exponent
    pub(crate) struct TestRsaKey {
        pub public: RsaPublicKey,
        n: BigUint,
        d: BigUint,
    }

    impl TestRsaKey {
        pub(crate) fn generate() -> Self {
            let mut rng = rand::thread_rng();
            let private = ::rsa::RsaPrivateKey::new(&mut rng, 1024).unwrap();
            let n = private.n().to_bytes_be();
            let e = private.e().to_bytes_be();
            let mut exponent = vec![0u8; RSA_EXPONENT_LENGTH - e.len()];
            exponent.extend(e);
            Self {
                public: RsaPublicKey::new(&n, &exponent).unwrap(),
                n: BigUint::from_bytes_be(&n),
                d: BigUint::from_bytes_be(&private.d().to_bytes_be()),
            }
        }

        /// Raw private-key operation on a modulus-length block
        pub(crate) fn sign_raw(&self, block: &[u8]) -> Vec<u8> {
            let s = BigUint::from_bytes_be(block).modpow(&self.d, &self.n).to_bytes_be();
            let mut result = vec![0u8; RSA_MODULUS_LENGTH - s.len()];
            result.extend(s);
            result
        }
    }

    #[test]
    fn test_recover_inverts_private_operation() {
        let key = TestRsaKey::generate();
        let mut block = vec![0x6A; RSA_MODULUS_LENGTH];
        block[RSA_MODULUS_LENGTH - 1] = 0xBC;
        let signature = key.sign_raw(&block);
        assert_eq!(key.public.recover(&signature).unwrap(), block);
    }

    #[test]
    fn test_recover_rejects_bad_signature_length() {
        let key = TestRsaKey::generate();
        assert!(matches!(
            key.public.recover(&[0x01; 127]),
            Err(TachoError::SignatureMismatch(_))
        ));
        assert!(key.public.recover(&[0xFF; 128]).is_err());
    }

    #[test]
    fn test_root_key_layout() {
        let mut data = vec![0x11; 8];
        data.extend([0xC5; 128]);
        data.extend([0, 0, 0, 0, 0, 1, 0, 1]);
        let root = RsaRootKey::decode(&data).unwrap();
        assert_eq!(root.reference.value(), 0x1111_1111_1111_1111);
        assert_eq!(root.key.exponent(), &[0, 0, 0, 0, 0, 1, 0, 1]);
        assert_eq!(root.encode(), data);
        assert!(RsaRootKey::decode(&data[..143]).is_err());
    }

    #[test]
    fn test_zero_key_is_missing() {
        assert!(matches!(
            RsaPublicKey::new(&[0; 128], &[0, 1]),
            Err(TachoError::MissingPublicKey(_))
        ));
    }
}
