//! Curves named by generation 2 certificates
//!
//! NIST curves are verified through the `p256`, `p384` and `p521` crates.
//! The Brainpool curves have no verifier in that family, so their domain
//! parameters live here with Jacobian point arithmetic over
//! `y^2 = x^3 + ax + b` for a general `a`.

use crate::constants;
use crate::hash::HashAlgorithm;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use tacho_asn1::ber::format_oid;
use tacho_core::error::{TachoError, TachoResult};

/// Supported curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    BrainpoolP256r1,
    NistP256,
    BrainpoolP384r1,
    NistP384,
    BrainpoolP512r1,
    NistP521,
}

impl Curve {
    pub const ALL: [Curve; 6] = [
        Curve::BrainpoolP256r1,
        Curve::NistP256,
        Curve::BrainpoolP384r1,
        Curve::NistP384,
        Curve::BrainpoolP512r1,
        Curve::NistP521,
    ];

    /// Object identifier
    pub fn oid(&self) -> &'static [u32] {
        match self {
            Curve::BrainpoolP256r1 => constants::BRAINPOOL_P256R1,
            Curve::NistP256 => constants::NIST_P256,
            Curve::BrainpoolP384r1 => constants::BRAINPOOL_P384R1,
            Curve::NistP384 => constants::NIST_P384,
            Curve::BrainpoolP512r1 => constants::BRAINPOOL_P512R1,
            Curve::NistP521 => constants::NIST_P521,
        }
    }

    /// Look up a curve by object identifier
    ///
    /// # Error Handling
    /// [`TachoError::UnsupportedCurve`] with the dotted OID when it names
    /// none of the six curves.
    pub fn from_oid(oid: &[u32]) -> TachoResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|curve| curve.oid() == oid)
            .ok_or_else(|| TachoError::UnsupportedCurve(format_oid(oid)))
    }

    /// Digest paired with the curve's strength
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            Curve::BrainpoolP256r1 | Curve::NistP256 => HashAlgorithm::Sha256,
            Curve::BrainpoolP384r1 | Curve::NistP384 => HashAlgorithm::Sha384,
            Curve::BrainpoolP512r1 | Curve::NistP521 => HashAlgorithm::Sha512,
        }
    }

    /// Field element length in bytes
    pub fn field_size(&self) -> usize {
        match self {
            Curve::BrainpoolP256r1 | Curve::NistP256 => 32,
            Curve::BrainpoolP384r1 | Curve::NistP384 => 48,
            Curve::BrainpoolP512r1 => 64,
            Curve::NistP521 => 66,
        }
    }

    /// Length of one signature component (r or s) in bytes
    pub fn scalar_size(&self) -> usize {
        // every group order here has the bit length of its field prime
        self.field_size()
    }

    pub fn is_brainpool(&self) -> bool {
        matches!(
            self,
            Curve::BrainpoolP256r1 | Curve::BrainpoolP384r1 | Curve::BrainpoolP512r1
        )
    }

    /// Domain parameters for the in-crate arithmetic; `None` for NIST curves
    pub fn brainpool_params(&self) -> Option<&'static CurveParams> {
        match self {
            Curve::BrainpoolP256r1 => Some(&BRAINPOOL_P256R1_PARAMS),
            Curve::BrainpoolP384r1 => Some(&BRAINPOOL_P384R1_PARAMS),
            Curve::BrainpoolP512r1 => Some(&BRAINPOOL_P512R1_PARAMS),
            Curve::NistP256 | Curve::NistP384 | Curve::NistP521 => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Curve::BrainpoolP256r1 => "brainpoolP256r1",
            Curve::NistP256 => "NIST P-256",
            Curve::BrainpoolP384r1 => "brainpoolP384r1",
            Curve::NistP384 => "NIST P-384",
            Curve::BrainpoolP512r1 => "brainpoolP512r1",
            Curve::NistP521 => "NIST P-521",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point in affine coordinates (never the point at infinity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinePoint {
    pub x: BigUint,
    pub y: BigUint,
}

/// Jacobian point `(X : Y : Z)` for `(X/Z^2, Y/Z^3)`; `Z = 0` is infinity
#[derive(Debug, Clone)]
struct JacobianPoint {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

impl JacobianPoint {
    fn infinity() -> Self {
        Self {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }
}

/// Domain parameters
#[derive(Debug, Clone)]
pub struct CurveParams {
    /// Field prime
    pub p: BigUint,
    pub a: BigUint,
    pub b: BigUint,
    /// Base point
    pub g: AffinePoint,
    /// Group order
    pub n: BigUint,
}

fn hex(value: &str) -> BigUint {
    BigUint::parse_bytes(value.as_bytes(), 16).unwrap_or_default()
}

impl CurveParams {
    fn from_hex(p: &str, a: &str, b: &str, gx: &str, gy: &str, n: &str) -> Self {
        Self {
            p: hex(p),
            a: hex(a),
            b: hex(b),
            g: AffinePoint { x: hex(gx), y: hex(gy) },
            n: hex(n),
        }
    }

    fn add_mod(&self, x: &BigUint, y: &BigUint) -> BigUint {
        (x + y) % &self.p
    }

    fn sub_mod(&self, x: &BigUint, y: &BigUint) -> BigUint {
        ((x + &self.p) - (y % &self.p)) % &self.p
    }

    fn mul_mod(&self, x: &BigUint, y: &BigUint) -> BigUint {
        (x * y) % &self.p
    }

    fn inv_mod(&self, x: &BigUint) -> BigUint {
        // p is prime: x^(p-2) = x^-1
        x.modpow(&(&self.p - 2u32), &self.p)
    }

    /// Whether `point` satisfies the curve equation with coordinates in range
    pub fn contains(&self, point: &AffinePoint) -> bool {
        if point.x >= self.p || point.y >= self.p {
            return false;
        }
        let lhs = self.mul_mod(&point.y, &point.y);
        let x3 = self.mul_mod(&self.mul_mod(&point.x, &point.x), &point.x);
        let rhs = self.add_mod(&self.add_mod(&x3, &self.mul_mod(&self.a, &point.x)), &self.b);
        lhs == rhs
    }

    fn to_jacobian(&self, point: &AffinePoint) -> JacobianPoint {
        JacobianPoint {
            x: point.x.clone(),
            y: point.y.clone(),
            z: BigUint::one(),
        }
    }

    fn to_affine(&self, point: &JacobianPoint) -> Option<AffinePoint> {
        if point.is_infinity() {
            return None;
        }
        let z_inv = self.inv_mod(&point.z);
        let z_inv2 = self.mul_mod(&z_inv, &z_inv);
        let z_inv3 = self.mul_mod(&z_inv2, &z_inv);
        Some(AffinePoint {
            x: self.mul_mod(&point.x, &z_inv2),
            y: self.mul_mod(&point.y, &z_inv3),
        })
    }

    fn double(&self, point: &JacobianPoint) -> JacobianPoint {
        if point.is_infinity() || point.y.is_zero() {
            return JacobianPoint::infinity();
        }
        let xx = self.mul_mod(&point.x, &point.x);
        let yy = self.mul_mod(&point.y, &point.y);
        let yyyy = self.mul_mod(&yy, &yy);
        let zz = self.mul_mod(&point.z, &point.z);
        // S = 4*X*YY
        let s = self.mul_mod(&(&point.x * 4u32), &yy);
        // M = 3*XX + a*ZZ^2
        let m = self.add_mod(
            &((&xx * 3u32) % &self.p),
            &self.mul_mod(&self.a, &self.mul_mod(&zz, &zz)),
        );
        let x3 = self.sub_mod(&self.mul_mod(&m, &m), &((&s * 2u32) % &self.p));
        let y3 = self.sub_mod(
            &self.mul_mod(&m, &self.sub_mod(&s, &x3)),
            &((&yyyy * 8u32) % &self.p),
        );
        let z3 = self.mul_mod(&(&point.y * 2u32), &point.z);
        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    fn add(&self, lhs: &JacobianPoint, rhs: &JacobianPoint) -> JacobianPoint {
        if lhs.is_infinity() {
            return rhs.clone();
        }
        if rhs.is_infinity() {
            return lhs.clone();
        }
        let z1z1 = self.mul_mod(&lhs.z, &lhs.z);
        let z2z2 = self.mul_mod(&rhs.z, &rhs.z);
        let u1 = self.mul_mod(&lhs.x, &z2z2);
        let u2 = self.mul_mod(&rhs.x, &z1z1);
        let s1 = self.mul_mod(&self.mul_mod(&lhs.y, &rhs.z), &z2z2);
        let s2 = self.mul_mod(&self.mul_mod(&rhs.y, &lhs.z), &z1z1);
        let h = self.sub_mod(&u2, &u1);
        let r = self.sub_mod(&s2, &s1);
        if h.is_zero() {
            return if r.is_zero() {
                self.double(lhs)
            } else {
                JacobianPoint::infinity()
            };
        }
        let hh = self.mul_mod(&h, &h);
        let hhh = self.mul_mod(&h, &hh);
        let v = self.mul_mod(&u1, &hh);
        let x3 = self.sub_mod(
            &self.sub_mod(&self.mul_mod(&r, &r), &hhh),
            &((&v * 2u32) % &self.p),
        );
        let y3 = self.sub_mod(
            &self.mul_mod(&r, &self.sub_mod(&v, &x3)),
            &self.mul_mod(&s1, &hhh),
        );
        let z3 = self.mul_mod(&self.mul_mod(&lhs.z, &rhs.z), &h);
        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    fn multiply_jacobian(&self, scalar: &BigUint, point: &JacobianPoint) -> JacobianPoint {
        let mut result = JacobianPoint::infinity();
        for i in (0..scalar.bits()).rev() {
            result = self.double(&result);
            if scalar.bit(i) {
                result = self.add(&result, point);
            }
        }
        result
    }

    /// `scalar * point`; `None` is the point at infinity
    pub fn multiply(&self, scalar: &BigUint, point: &AffinePoint) -> Option<AffinePoint> {
        self.to_affine(&self.multiply_jacobian(scalar, &self.to_jacobian(point)))
    }

    /// `u1 * G + u2 * q`; `None` is the point at infinity
    pub fn multiply_add(
        &self,
        u1: &BigUint,
        u2: &BigUint,
        q: &AffinePoint,
    ) -> Option<AffinePoint> {
        let lhs = self.multiply_jacobian(u1, &self.to_jacobian(&self.g));
        let rhs = self.multiply_jacobian(u2, &self.to_jacobian(q));
        self.to_affine(&self.add(&lhs, &rhs))
    }
}

static BRAINPOOL_P256R1_PARAMS: Lazy<CurveParams> = Lazy::new(|| {
    CurveParams::from_hex(
        "A9FB57DBA1EEA9BC3E660A909D838D726E3BF623D52620282013481D1F6E5377",
        "7D5A0975FC2C3057EEF67530417AFFE7FB8055C126DC5C6CE94A4B44F330B5D9",
        "26DC5C6CE94A4B44F330B5D9BBD77CBF958416295CF7E1CE6BCCDC18FF8C07B6",
        "8BD2AEB9CB7E57CB2C4B482FFC81B7AFB9DE27E1E3BD23C23A4453BD9ACE3262",
        "547EF835C3DAC4FD97F8461A14611DC9C27745132DED8E545C1D54C72F046997",
        "A9FB57DBA1EEA9BC3E660A909D838D718C397AA3B561A6F7901E0E82974856A7",
    )
});

static BRAINPOOL_P384R1_PARAMS: Lazy<CurveParams> = Lazy::new(|| {
    CurveParams::from_hex(
        "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B412B1DA197FB71123ACD3A729901D1A71874700133107EC53",
        "7BC382C63D8C150C3C72080ACE05AFA0C2BEA28E4FB22787139165EFBA91F90F8AA5814A503AD4EB04A8C7DD22CE2826",
        "04A8C7DD22CE28268B39B55416F0447C2FB77DE107DCD2A62E880EA53EEB62D57CB4390295DBC9943AB78696FA504C11",
        "1D1C64F068CF45FFA2A63A81B7C13F6B8847A3E77EF14FE3DB7FCAFE0CBD10E8E826E03436D646AAEF87B2E247D4AF1E",
        "8ABE1D7520F9C2A45CB1EB8E95CFD55262B70B29FEEC5864E19C054FF99129280E4646217791811142820341263C5315",
        "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B31F166E6CAC0425A7CF3AB6AF6B7FC3103B883202E9046565",
    )
});

static BRAINPOOL_P512R1_PARAMS: Lazy<CurveParams> = Lazy::new(|| {
    CurveParams::from_hex(
        "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA703308717D4D9B009BC66842AECDA12AE6A380E62881FF2F2D82C68528AA6056583A48F3",
        "7830A3318B603B89E2327145AC234CC594CBDD8D3DF91610A83441CAEA9863BC2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A72BF2C7B9E7C1AC4D77FC94CA",
        "3DF91610A83441CAEA9863BC2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A72BF2C7B9E7C1AC4D77FC94CADC083E67984050B75EBAE5DD2809BD638016F723",
        "81AEE4BDD82ED9645A21322E9C4C6A9385ED9F70B5D916C1B43B62EEF4D0098EFF3B1F78E2D0D48D50D1687B93B97D5F7C6D5047406A5E688B352209BCB9F822",
        "7DDE385D566332ECC0EABFA9CF7822FDF209F70024A57B1AA000C55B881F8111B2DCDE494A5F485E5BCA4BD88A2763AED1CA2B2FA8F0540678CD1E0F3AD80892",
        "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330870553E5C414CA92619418661197FAC10471DB1D381085DDADDB58796829CA90069",
    )
});
