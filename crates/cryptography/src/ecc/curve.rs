use super::{ECFieldElement, ECPoint};
use crate::{Error, Result};
use hex_literal::hex;
use num_bigint::BigUint;
use num_traits::Zero;
use once_cell::sync::Lazy;
use std::fmt;

static SECP256K1: Lazy<ECCurve> = Lazy::new(|| ECCurve {
    name: "secp256k1",
    p: BigUint::from_bytes_be(&hex!(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"
    )),
    a: BigUint::zero(),
    b: BigUint::from(7u32),
    n: BigUint::from_bytes_be(&hex!(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"
    )),
    gx: BigUint::from_bytes_be(&hex!(
        "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"
    )),
    gy: BigUint::from_bytes_be(&hex!(
        "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"
    )),
});

/// Represents a short Weierstrass curve `y² = x³ + a·x + b` over `GF(p)`.
///
/// Curves are immutable once built and are shared as `&'static` references,
/// so points and field elements can borrow their parameters freely.
pub struct ECCurve {
    name: &'static str,
    p: BigUint,
    a: BigUint,
    b: BigUint,
    n: BigUint,
    gx: BigUint,
    gy: BigUint,
}

impl ECCurve {
    /// Builds a curve from its domain parameters.
    ///
    /// Rejects singular curves and generators that are not on the curve.
    /// `p` and `n` are trusted to be prime.
    pub fn new(
        name: &'static str,
        p: BigUint,
        a: BigUint,
        b: BigUint,
        n: BigUint,
        gx: BigUint,
        gy: BigUint,
    ) -> Result<Self> {
        if a >= p || b >= p || gx >= p || gy >= p {
            return Err(Error::invalid_format("curve parameter is not below the modulus"));
        }

        let curve = Self {
            name,
            p,
            a,
            b,
            n,
            gx,
            gy,
        };

        // 4a³ + 27b² ≠ 0
        let a = curve.field(&curve.a);
        let b = curve.field(&curve.b);
        let four = curve.field(&BigUint::from(4u32));
        let twenty_seven = curve.field(&BigUint::from(27u32));
        let discriminant = &(&four * &(&a.square() * &a)) + &(&twenty_seven * &b.square());
        if discriminant.is_zero() {
            return Err(Error::invalid_format("curve is singular"));
        }

        let x = curve.field(&curve.gx);
        let y = curve.field(&curve.gy);
        if !curve.contains(&x, &y) {
            return Err(Error::invalid_format("generator is not on the curve"));
        }

        Ok(curve)
    }

    /// The secp256k1 curve used for all keys.
    pub fn secp256k1() -> &'static ECCurve {
        &SECP256K1
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field prime `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn a(&self) -> &BigUint {
        &self.a
    }

    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// The order `n` of the generator.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Size in bytes of an encoded field element.
    pub fn coordinate_size(&self) -> usize {
        ((self.p.bits() as usize) + 7) / 8
    }

    /// The generator point `G`.
    pub fn generator(&'static self) -> ECPoint {
        ECPoint::from_coordinates(self, self.field(&self.gx), self.field(&self.gy))
    }

    /// The point at infinity.
    pub fn infinity(&'static self) -> ECPoint {
        ECPoint::infinity(self)
    }

    /// Reduces `value` into this curve's base field.
    pub fn field(&self, value: &BigUint) -> ECFieldElement<'_> {
        ECFieldElement::reduce(value, &self.p)
    }

    /// Right-hand side of the curve equation, `x³ + a·x + b`.
    pub(crate) fn rhs<'a>(&'a self, x: &ECFieldElement<'a>) -> ECFieldElement<'a> {
        let a = self.field(&self.a);
        let b = self.field(&self.b);
        &(&(&x.square() * x) + &(&a * x)) + &b
    }

    /// Checks `y² = x³ + a·x + b`.
    pub(crate) fn contains<'a>(&'a self, x: &ECFieldElement<'a>, y: &ECFieldElement<'a>) -> bool {
        y.square() == self.rhs(x)
    }
}

impl fmt::Debug for ECCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ECCurve")
            .field("name", &self.name)
            .field("p", &format_args!("{:x}", self.p))
            .field("n", &format_args!("{:x}", self.n))
            .finish()
    }
}
