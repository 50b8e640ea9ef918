//! Field element implementation for elliptic curve operations.

use super::mod_inverse;
use crate::{Error, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Represents an element of the prime field `GF(p)`.
///
/// The value is kept normalized into `[0, p)` by every operation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ECFieldElement<'a> {
    value: BigUint,
    p: &'a BigUint,
}

impl<'a> ECFieldElement<'a> {
    /// Creates a new field element.
    ///
    /// # Arguments
    ///
    /// * `value` - The value of the field element
    /// * `p` - The prime modulus of the field
    ///
    /// # Returns
    ///
    /// A new `ECFieldElement` or an error if the value is not below `p`
    pub fn new(value: BigUint, p: &'a BigUint) -> Result<Self> {
        if &value >= p {
            return Err(Error::invalid_format("field element is not below the modulus"));
        }

        Ok(Self { value, p })
    }

    /// Creates a field element from any integer by reducing it modulo `p`.
    pub fn reduce(value: &BigUint, p: &'a BigUint) -> Self {
        Self {
            value: value % p,
            p,
        }
    }

    pub fn zero(p: &'a BigUint) -> Self {
        Self {
            value: BigUint::zero(),
            p,
        }
    }

    pub fn one(p: &'a BigUint) -> Self {
        Self {
            value: BigUint::one(),
            p,
        }
    }

    /// The canonical representative in `[0, p)`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn modulus(&self) -> &'a BigUint {
        self.p
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_odd(&self) -> bool {
        self.value.bit(0)
    }

    /// Computes the square of this field element.
    pub fn square(&self) -> Self {
        self * self
    }

    /// Raises this field element to the specified power.
    pub fn pow(&self, exp: &BigUint) -> Self {
        #[cfg(test)]
        super::op_counts::record(&super::op_counts::EXPONENTIATIONS);

        Self {
            value: self.value.modpow(exp, self.p),
            p: self.p,
        }
    }

    /// Computes the multiplicative inverse of this field element.
    ///
    /// Returns `None` only for zero.
    pub fn invert(&self) -> Option<Self> {
        mod_inverse(&self.value, self.p).map(|value| Self { value, p: self.p })
    }

    /// Computes a square root of this field element.
    ///
    /// When `p ≡ 3 (mod 4)` the root is `a^((p+1)/4)`; other primes go through
    /// Tonelli–Shanks. Returns `None` when the element is a non-residue.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(self.clone());
        }

        let root = if self.p % 4u32 == BigUint::from(3u32) {
            let exp = (self.p + 1u32) >> 2usize;
            self.pow(&exp)
        } else {
            self.tonelli_shanks()?
        };

        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }

    fn tonelli_shanks(&self) -> Option<Self> {
        let p_minus_one = self.p - 1u32;
        let legendre_exp = &p_minus_one >> 1usize;

        // Euler's criterion
        if !self.pow(&legendre_exp).value.is_one() {
            return None;
        }

        // p - 1 = q * 2^s with q odd
        let s = p_minus_one.trailing_zeros().unwrap_or(0);
        let q = &p_minus_one >> s;

        // Any quadratic non-residue works as the generator of the 2-Sylow subgroup
        let mut z = Self::reduce(&BigUint::from(2u32), self.p);
        while z.pow(&legendre_exp).value != p_minus_one {
            z = &z + &Self::one(self.p);
        }

        let mut m = s;
        let mut c = z.pow(&q);
        let mut t = self.pow(&q);
        let mut r = self.pow(&((&q + 1u32) >> 1usize));

        while !t.value.is_one() {
            let mut i = 0u64;
            let mut t_power = t.clone();
            while !t_power.value.is_one() {
                t_power = t_power.square();
                i += 1;
                if i == m {
                    return None;
                }
            }

            let b = c.pow(&(BigUint::one() << (m - i - 1)));
            m = i;
            c = b.square();
            t = &t * &c;
            r = &r * &b;
        }

        Some(r)
    }

    /// Big-endian encoding left-padded to `len` bytes.
    pub fn to_bytes_be(&self, len: usize) -> Vec<u8> {
        super::to_fixed_bytes(&self.value, len)
    }
}

impl<'a> Add for &ECFieldElement<'a> {
    type Output = ECFieldElement<'a>;

    fn add(self, other: &ECFieldElement<'a>) -> ECFieldElement<'a> {
        assert_eq!(
            self.p, other.p,
            "Cannot add field elements with different moduli"
        );

        let mut value = &self.value + &other.value;
        if &value >= self.p {
            value -= self.p;
        }

        ECFieldElement { value, p: self.p }
    }
}

impl<'a> Sub for &ECFieldElement<'a> {
    type Output = ECFieldElement<'a>;

    fn sub(self, other: &ECFieldElement<'a>) -> ECFieldElement<'a> {
        assert_eq!(
            self.p, other.p,
            "Cannot subtract field elements with different moduli"
        );

        let value = if self.value >= other.value {
            &self.value - &other.value
        } else {
            self.p - &other.value + &self.value
        };

        ECFieldElement { value, p: self.p }
    }
}

impl<'a> Mul for &ECFieldElement<'a> {
    type Output = ECFieldElement<'a>;

    fn mul(self, other: &ECFieldElement<'a>) -> ECFieldElement<'a> {
        assert_eq!(
            self.p, other.p,
            "Cannot multiply field elements with different moduli"
        );
        #[cfg(test)]
        super::op_counts::record(&super::op_counts::MULTIPLICATIONS);

        let value = (&self.value * &other.value) % self.p;
        ECFieldElement { value, p: self.p }
    }
}

impl<'a> Neg for &ECFieldElement<'a> {
    type Output = ECFieldElement<'a>;

    fn neg(self) -> ECFieldElement<'a> {
        let value = if self.value.is_zero() {
            BigUint::zero()
        } else {
            self.p - &self.value
        };

        ECFieldElement { value, p: self.p }
    }
}

impl fmt::Debug for ECFieldElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECFieldElement({:x})", self.value)
    }
}

impl fmt::Display for ECFieldElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
