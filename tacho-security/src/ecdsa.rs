//! ECDSA verification

use crate::curve::{AffinePoint, Curve, CurveParams};
use num_bigint::BigUint;
use num_traits::Zero;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use serde::{Deserialize, Serialize};
use tacho_core::error::{TachoError, TachoResult};

/// Elliptic curve public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcPublicKey {
    curve: Curve,
    /// Uncompressed point `04 || x || y`
    #[serde(with = "serde_bytes")]
    point: Vec<u8>,
}

impl EcPublicKey {
    /// Create from an uncompressed point `04 || x || y`
    ///
    /// # Error Handling
    /// - [`TachoError::MissingPublicKey`] for an empty point
    /// - [`TachoError::InvalidData`] when the encoding does not match the
    ///   curve's field size or the point is not on the curve
    pub fn from_uncompressed(curve: Curve, point: &[u8]) -> TachoResult<Self> {
        if point.is_empty() {
            return Err(TachoError::MissingPublicKey(format!(
                "empty {} public point",
                curve
            )));
        }
        let size = curve.field_size();
        if point.len() != 1 + 2 * size || point[0] != 0x04 {
            return Err(TachoError::InvalidData(format!(
                "{} public point must be 04 followed by {} bytes, got {} bytes starting {:02X}",
                curve,
                2 * size,
                point.len(),
                point[0]
            )));
        }
        let on_curve = match curve {
            Curve::NistP256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(point).is_ok(),
            Curve::NistP384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(point).is_ok(),
            Curve::NistP521 => p521::ecdsa::VerifyingKey::from_sec1_bytes(point).is_ok(),
            _ => match curve.brainpool_params() {
                Some(params) => params.contains(&split_point(point, size)),
                None => false,
            },
        };
        if !on_curve {
            return Err(TachoError::InvalidData(format!(
                "public point is not on {}",
                curve
            )));
        }
        Ok(Self {
            curve,
            point: point.to_vec(),
        })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Uncompressed point bytes
    pub fn point(&self) -> &[u8] {
        &self.point
    }

    /// Verify a signature `r || s` over `message`
    ///
    /// The message is hashed with the digest paired with this key's curve.
    ///
    /// # Error Handling
    /// [`TachoError::SignatureMismatch`] when the signature is malformed or
    /// does not verify.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> TachoResult<()> {
        let digest = self.curve.hash_algorithm().digest(message);
        self.verify_digest(&digest, signature)
    }

    /// Verify a signature `r || s` over a precomputed digest
    ///
    /// `r` and `s` each take exactly the curve's scalar size.
    pub fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> TachoResult<()> {
        let expected = 2 * self.curve.scalar_size();
        if signature.len() != expected {
            return Err(TachoError::SignatureMismatch(format!(
                "{} signature must be {} bytes, got {}",
                self.curve,
                expected,
                signature.len()
            )));
        }
        let verified = match self.curve {
            Curve::NistP256 => {
                let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(&self.point);
                let signature = p256::ecdsa::Signature::from_slice(signature);
                match (key, signature) {
                    (Ok(key), Ok(signature)) => key.verify_prehash(digest, &signature).is_ok(),
                    _ => false,
                }
            }
            Curve::NistP384 => {
                let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(&self.point);
                let signature = p384::ecdsa::Signature::from_slice(signature);
                match (key, signature) {
                    (Ok(key), Ok(signature)) => key.verify_prehash(digest, &signature).is_ok(),
                    _ => false,
                }
            }
            Curve::NistP521 => {
                let key = p521::ecdsa::VerifyingKey::from_sec1_bytes(&self.point);
                let signature = p521::ecdsa::Signature::from_slice(signature);
                match (key, signature) {
                    (Ok(key), Ok(signature)) => key.verify_prehash(digest, &signature).is_ok(),
                    _ => false,
                }
            }
            _ => match self.curve.brainpool_params() {
                Some(params) => self.verify_brainpool(params, digest, signature),
                None => false,
            },
        };
        if verified {
            Ok(())
        } else {
            Err(TachoError::SignatureMismatch(format!(
                "ECDSA signature does not verify under {} key",
                self.curve
            )))
        }
    }

    /// SEC 1 section 4.1.4 over the in-crate Brainpool arithmetic
    fn verify_brainpool(&self, params: &CurveParams, digest: &[u8], signature: &[u8]) -> bool {
        let (r, s) = signature.split_at(signature.len() / 2);
        let r = BigUint::from_bytes_be(r);
        let s = BigUint::from_bytes_be(s);
        let n = &params.n;
        if r.is_zero() || s.is_zero() || &r >= n || &s >= n {
            return false;
        }

        let e = digest_to_scalar(digest, n.bits());
        // n is prime: s^(n-2) = s^-1 mod n
        let w = s.modpow(&(n - 2u32), n);
        let u1 = (&e * &w) % n;
        let u2 = (&r * &w) % n;

        let q = split_point(&self.point, self.curve.field_size());
        match params.multiply_add(&u1, &u2, &q) {
            Some(point) => point.x % n == r,
            None => false,
        }
    }
}

fn split_point(point: &[u8], size: usize) -> AffinePoint {
    AffinePoint {
        x: BigUint::from_bytes_be(&point[1..=size]),
        y: BigUint::from_bytes_be(&point[1 + size..]),
    }
}

/// Leftmost `order_bits` bits of the digest as an integer
fn digest_to_scalar(digest: &[u8], order_bits: u64) -> BigUint {
    let e = BigUint::from_bytes_be(digest);
    let digest_bits = digest.len() as u64 * 8;
    if digest_bits > order_bits {
        e >> (digest_bits - order_bits)
    } else {
        e
    }
}
