//! Elliptic curve arithmetic over short Weierstrass curves.
//!
//! [`ECFieldElement`] implements arithmetic in `GF(p)`, [`ECCurve`] holds the
//! immutable domain parameters and [`ECPoint`] implements the group law on
//! affine coordinates.

mod curve;
mod field_element;
mod point;

pub use curve::*;
pub use field_element::*;
pub use point::*;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

/// Computes `value⁻¹ mod modulus` with the extended Euclidean algorithm.
///
/// Returns `None` when the inverse does not exist (`value ≡ 0` for a prime modulus).
pub(crate) fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    #[cfg(test)]
    op_counts::record(&op_counts::INVERSIONS);

    let m = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let mut old_r = BigInt::from_biguint(Sign::Plus, value % modulus);
    let mut r = m.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }

    let mut inverse = old_s % &m;
    if inverse.sign() == Sign::Minus {
        inverse += &m;
    }
    inverse.to_biguint()
}

/// Big-endian encoding of `value`, left-padded with zeros to `len` bytes.
///
/// Values wider than `len` bytes keep their low-order `len` bytes; callers only
/// pass values already known to fit.
pub(crate) fn to_fixed_bytes(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; len];
    if bytes.len() >= len {
        out.copy_from_slice(&bytes[bytes.len() - len..]);
    } else {
        out[len - bytes.len()..].copy_from_slice(&bytes);
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_inverse() {
        let m = BigUint::from(97u32);
        for v in 1..97u32 {
            let inv = mod_inverse(&BigUint::from(v), &m).unwrap();
            assert_eq!((BigUint::from(v) * inv) % &m, BigUint::one());
        }
        assert!(mod_inverse(&BigUint::zero(), &m).is_none());
        assert!(mod_inverse(&BigUint::from(97u32 * 3), &m).is_none());
        // composite modulus without a common factor
        assert_eq!(
            mod_inverse(&BigUint::from(3u32), &BigUint::from(10u32)),
            Some(BigUint::from(7u32))
        );
    }

    #[test]
    fn test_to_fixed_bytes() {
        assert_eq!(to_fixed_bytes(&BigUint::from(0x0102u32), 4), vec![0, 0, 1, 2]);
        assert_eq!(to_fixed_bytes(&BigUint::zero(), 2), vec![0, 0]);
        assert_eq!(to_fixed_bytes(&BigUint::from(0x010203u32), 2), vec![2, 3]);
    }
}
