//! Elliptic curve point implementation.
//!
//! Points are kept in affine coordinates. The identity element is the point at
//! infinity, which has no coordinates. Secret-scalar multiplication works on
//! projective coordinates internally and converts back once at the end.

use super::{ECCurve, ECFieldElement};
use crate::{Error, Result};
use num_bigint::BigUint;
use std::fmt;
use std::ops::{Add, Neg};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroizing;

/// Width of the random multiple of the order added to secret scalars.
const BLINDING_BITS: u64 = 64;

/// Represents a point on an elliptic curve.
#[derive(Clone)]
pub struct ECPoint {
    curve: &'static ECCurve,
    coordinates: Option<(ECFieldElement<'static>, ECFieldElement<'static>)>,
}

impl ECPoint {
    /// Creates the point at infinity on `curve`.
    pub fn infinity(curve: &'static ECCurve) -> Self {
        Self {
            curve,
            coordinates: None,
        }
    }

    /// Builds a point from coordinates already known to satisfy the curve equation.
    pub(crate) fn from_coordinates(
        curve: &'static ECCurve,
        x: ECFieldElement<'static>,
        y: ECFieldElement<'static>,
    ) -> Self {
        debug_assert!(curve.contains(&x, &y), "point is not on the curve");
        Self {
            curve,
            coordinates: Some((x, y)),
        }
    }

    /// Creates a point from affine coordinates, validating that it lies on `curve`.
    pub fn from_affine(curve: &'static ECCurve, x: BigUint, y: BigUint) -> Result<Self> {
        let x = ECFieldElement::new(x, curve.p())
            .map_err(|_| Error::invalid_key("x coordinate is not below the field modulus"))?;
        let y = ECFieldElement::new(y, curve.p())
            .map_err(|_| Error::invalid_key("y coordinate is not below the field modulus"))?;

        if !curve.contains(&x, &y) {
            return Err(Error::invalid_key("point is not on the curve"));
        }

        Ok(Self {
            curve,
            coordinates: Some((x, y)),
        })
    }

    pub fn curve(&self) -> &'static ECCurve {
        self.curve
    }

    pub fn is_infinity(&self) -> bool {
        self.coordinates.is_none()
    }

    /// Checks whether the point satisfies the curve equation.
    ///
    /// The point at infinity is always on the curve.
    pub fn is_on_curve(&self) -> bool {
        match &self.coordinates {
            None => true,
            Some((x, y)) => self.curve.contains(x, y),
        }
    }

    /// The affine x coordinate, or `None` for the point at infinity.
    pub fn x(&self) -> Option<&BigUint> {
        self.coordinates.as_ref().map(|(x, _)| x.value())
    }

    /// The affine y coordinate, or `None` for the point at infinity.
    pub fn y(&self) -> Option<&BigUint> {
        self.coordinates.as_ref().map(|(_, y)| y.value())
    }

    pub fn negate(&self) -> ECPoint {
        match &self.coordinates {
            None => self.clone(),
            Some((x, y)) => Self::from_coordinates(self.curve, x.clone(), -y),
        }
    }

    /// Adds two points with the affine group law.
    ///
    /// # Panics
    ///
    /// Panics if the points belong to different curves.
    pub fn add(&self, other: &ECPoint) -> ECPoint {
        assert!(
            std::ptr::eq(self.curve, other.curve),
            "Cannot add points on different curves"
        );

        let (x1, y1) = match &self.coordinates {
            None => return other.clone(),
            Some(c) => c,
        };
        let (x2, y2) = match &other.coordinates {
            None => return self.clone(),
            Some(c) => c,
        };

        if x1 == x2 {
            if y1 == y2 {
                return self.double();
            }
            // y2 = -y1
            return Self::infinity(self.curve);
        }

        let slope = &(y2 - y1) * &(x2 - x1).invert().expect("x2 - x1 is non-zero");
        let x3 = &(&slope.square() - x1) - x2;
        let y3 = &(&slope * &(x1 - &x3)) - y1;

        Self::from_coordinates(self.curve, x3, y3)
    }

    /// Doubles the point.
    pub fn double(&self) -> ECPoint {
        let (x, y) = match &self.coordinates {
            None => return self.clone(),
            Some(c) => c,
        };

        if y.is_zero() {
            return Self::infinity(self.curve);
        }

        let curve = self.curve;
        let three = curve.field(&BigUint::from(3u32));
        let a = curve.field(curve.a());

        // λ = (3x² + a) / 2y
        let numerator = &(&three * &x.square()) + &a;
        let slope = &numerator * &(y + y).invert().expect("2y is non-zero");
        let x3 = &slope.square() - &(x + x);
        let y3 = &(&slope * &(x - &x3)) - y;

        Self::from_coordinates(curve, x3, y3)
    }

    /// Multiplies the point by a secret scalar.
    ///
    /// Uses the operating system's CSPRNG for scalar blinding; see
    /// [`ECPoint::multiply_with_rng`].
    ///
    /// # Panics
    ///
    /// Panics if the point is not on its curve.
    pub fn multiply(&self, k: &BigUint) -> ECPoint {
        self.multiply_with_rng(k, &mut OsRng)
    }

    /// Multiplies the point by a secret scalar with a blinded Montgomery ladder.
    ///
    /// `k` is reduced modulo the curve order and blinded as `k + r·n` with a
    /// random 64-bit `r`, then padded to a fixed width so every scalar runs
    /// the same number of ladder steps. Each step is one complete projective
    /// addition and one complete projective doubling, with no inversions and
    /// no branches on coordinates; the register swap is byte-wise masked. A
    /// single inversion by Fermat exponentiation converts the result back to
    /// affine coordinates.
    ///
    /// The complete formulas require a curve of prime order.
    ///
    /// # Panics
    ///
    /// Panics if the point is not on its curve.
    pub fn multiply_with_rng<R: RngCore + CryptoRng>(&self, k: &BigUint, rng: &mut R) -> ECPoint {
        assert!(
            self.is_on_curve(),
            "Cannot multiply a point that is not on the curve"
        );

        let n = self.curve.n();
        let width = n.bits() + BLINDING_BITS;
        let len = ((width + 7) / 8) as usize;

        let blinding = BigUint::from(rng.next_u64());
        let scalar = Zeroizing::new(super::to_fixed_bytes(&(k % n + blinding * n), len));

        let mut r0 = ProjectivePoint::identity(self.curve);
        let mut r1 = ProjectivePoint::from_affine(self);
        let mut swap = Choice::from(0u8);
        for i in (0..width).rev() {
            let bit = Choice::from(bit_at(&scalar, i));
            swap ^= bit;
            ProjectivePoint::conditional_swap(&mut r0, &mut r1, swap);
            swap = bit;

            r1 = r0.add(&r1);
            r0 = r0.add(&r0);
        }
        ProjectivePoint::conditional_swap(&mut r0, &mut r1, swap);

        let result = r0.to_affine();
        debug_assert!(result.is_on_curve());
        result
    }

    /// Multiplies the point by a public scalar with double-and-add.
    ///
    /// Runtime depends on the scalar, so this is only for values such as
    /// signature verification coefficients.
    ///
    /// # Panics
    ///
    /// Panics if the point is not on its curve.
    pub fn multiply_vartime(&self, k: &BigUint) -> ECPoint {
        assert!(
            self.is_on_curve(),
            "Cannot multiply a point that is not on the curve"
        );

        let k = k % self.curve.n();
        let mut result = Self::infinity(self.curve);
        for i in (0..k.bits()).rev() {
            result = result.double();
            if k.bit(i) {
                result = result.add(self);
            }
        }

        debug_assert!(result.is_on_curve());
        result
    }

    /// Encodes the point in SEC1 format.
    ///
    /// The point at infinity is the single byte `0x00`.
    pub fn encode_point(&self, compressed: bool) -> Vec<u8> {
        let (x, y) = match &self.coordinates {
            None => return vec![0x00],
            Some(c) => c,
        };

        let size = self.curve.coordinate_size();
        if compressed {
            let mut data = Vec::with_capacity(1 + size);
            data.push(if y.is_odd() { 0x03 } else { 0x02 });
            data.extend_from_slice(&x.to_bytes_be(size));
            data
        } else {
            let mut data = Vec::with_capacity(1 + 2 * size);
            data.push(0x04);
            data.extend_from_slice(&x.to_bytes_be(size));
            data.extend_from_slice(&y.to_bytes_be(size));
            data
        }
    }

    /// Decodes a SEC1 encoded point.
    ///
    /// Framing problems (prefix, length) are `InvalidFormat`; coordinates that
    /// do not describe a curve point are `InvalidKey`.
    pub fn decode_point(encoded: &[u8], curve: &'static ECCurve) -> Result<Self> {
        let size = curve.coordinate_size();

        match encoded.first() {
            None => Err(Error::invalid_format("empty point encoding")),
            Some(0x00) if encoded.len() == 1 => Ok(Self::infinity(curve)),
            Some(&(prefix @ (0x02 | 0x03))) => {
                if encoded.len() != 1 + size {
                    return Err(Error::invalid_format(format!(
                        "compressed point must be {} bytes, got {}",
                        1 + size,
                        encoded.len()
                    )));
                }
                Self::decompress(curve, BigUint::from_bytes_be(&encoded[1..]), prefix == 0x03)
            }
            Some(0x04) => {
                if encoded.len() != 1 + 2 * size {
                    return Err(Error::invalid_format(format!(
                        "uncompressed point must be {} bytes, got {}",
                        1 + 2 * size,
                        encoded.len()
                    )));
                }
                let x = BigUint::from_bytes_be(&encoded[1..1 + size]);
                let y = BigUint::from_bytes_be(&encoded[1 + size..]);
                Self::from_affine(curve, x, y)
            }
            Some(prefix) => Err(Error::invalid_format(format!(
                "unknown point encoding prefix 0x{prefix:02x}"
            ))),
        }
    }

    fn decompress(curve: &'static ECCurve, x: BigUint, y_is_odd: bool) -> Result<Self> {
        let x = ECFieldElement::new(x, curve.p())
            .map_err(|_| Error::invalid_key("x coordinate is not below the field modulus"))?;
        let beta = curve
            .rhs(&x)
            .sqrt()
            .ok_or_else(|| Error::invalid_key("x coordinate is not on the curve"))?;

        let y = if beta.is_odd() == y_is_odd { beta } else { -&beta };
        if y.is_odd() != y_is_odd {
            return Err(Error::invalid_key("no point with the requested y parity"));
        }

        Ok(Self::from_coordinates(curve, x, y))
    }
}

/// Homogeneous projective point `(X : Y : Z)` used inside the ladder.
///
/// The identity is `(0 : 1 : 0)`. Addition uses the complete formulas of
/// Renes, Costello and Batina, which are valid for every pair of inputs on a
/// prime-order curve, doubling included.
struct ProjectivePoint {
    curve: &'static ECCurve,
    x: ECFieldElement<'static>,
    y: ECFieldElement<'static>,
    z: ECFieldElement<'static>,
}

impl ProjectivePoint {
    fn identity(curve: &'static ECCurve) -> Self {
        Self {
            curve,
            x: ECFieldElement::zero(curve.p()),
            y: ECFieldElement::one(curve.p()),
            z: ECFieldElement::zero(curve.p()),
        }
    }

    fn from_affine(point: &ECPoint) -> Self {
        match &point.coordinates {
            None => Self::identity(point.curve),
            Some((x, y)) => Self {
                curve: point.curve,
                x: x.clone(),
                y: y.clone(),
                z: ECFieldElement::one(point.curve.p()),
            },
        }
    }

    fn add(&self, other: &ProjectivePoint) -> ProjectivePoint {
        let curve = self.curve;
        let a = curve.field(curve.a());
        let b3 = curve.field(&(curve.b() * 3u32));
        let (x1, y1, z1) = (&self.x, &self.y, &self.z);
        let (x2, y2, z2) = (&other.x, &other.y, &other.z);

        let t0 = x1 * x2;
        let t1 = y1 * y2;
        let t2 = z1 * z2;
        let t3 = &(&(x1 + y1) * &(x2 + y2)) - &(&t0 + &t1);
        let t4 = &(&(x1 + z1) * &(x2 + z2)) - &(&t0 + &t2);
        let t5 = &(&(y1 + z1) * &(y2 + z2)) - &(&t1 + &t2);

        let z3 = &(&a * &t4) + &(&b3 * &t2);
        let x3 = &t1 - &z3;
        let z3 = &t1 + &z3;
        let y3 = &x3 * &z3;

        let a_t2 = &a * &t2;
        let t1 = &(&(&t0 + &t0) + &t0) + &a_t2;
        let t2 = &a * &(&t0 - &a_t2);
        let t4 = &(&b3 * &t4) + &t2;

        let y3 = &y3 + &(&t1 * &t4);
        let x3 = &(&x3 * &t3) - &(&t5 * &t4);
        let z3 = &(&z3 * &t5) + &(&t3 * &t1);

        ProjectivePoint {
            curve,
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Converts back to affine coordinates with one inversion `Z^(p-2)`.
    fn to_affine(&self) -> ECPoint {
        if self.z.is_zero() {
            return ECPoint::infinity(self.curve);
        }
        let z_inv = self.z.pow(&(self.curve.p() - 2u32));
        ECPoint::from_coordinates(self.curve, &self.x * &z_inv, &self.y * &z_inv)
    }

    /// Fixed-width `X ‖ Y ‖ Z` image used by the masked swap.
    fn to_bytes(&self, size: usize) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(Vec::with_capacity(3 * size));
        out.extend_from_slice(&self.x.to_bytes_be(size));
        out.extend_from_slice(&self.y.to_bytes_be(size));
        out.extend_from_slice(&self.z.to_bytes_be(size));
        out
    }

    fn from_bytes(curve: &'static ECCurve, bytes: &[u8], size: usize) -> Self {
        Self {
            curve,
            x: curve.field(&BigUint::from_bytes_be(&bytes[..size])),
            y: curve.field(&BigUint::from_bytes_be(&bytes[size..2 * size])),
            z: curve.field(&BigUint::from_bytes_be(&bytes[2 * size..])),
        }
    }

    fn conditional_swap(a: &mut ProjectivePoint, b: &mut ProjectivePoint, choice: Choice) {
        let curve = a.curve;
        let size = curve.coordinate_size();
        let mut a_bytes = a.to_bytes(size);
        let mut b_bytes = b.to_bytes(size);

        for (x, y) in a_bytes.iter_mut().zip(b_bytes.iter_mut()) {
            u8::conditional_swap(x, y, choice);
        }

        *a = Self::from_bytes(curve, &a_bytes, size);
        *b = Self::from_bytes(curve, &b_bytes, size);
    }
}

/// Bit `index` (counting from the least significant bit) of a big-endian byte string.
fn bit_at(bytes: &[u8], index: u64) -> u8 {
    let byte = bytes.len() - 1 - (index / 8) as usize;
    (bytes[byte] >> (index % 8)) & 1
}

impl PartialEq for ECPoint {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.curve, other.curve) && self.coordinates == other.coordinates
    }
}

impl Eq for ECPoint {}

impl fmt::Debug for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coordinates {
            None => write!(f, "ECPoint({}, infinity)", self.curve.name()),
            Some((x, y)) => f
                .debug_struct("ECPoint")
                .field("curve", &self.curve.name())
                .field("x", &format_args!("{:x}", x.value()))
                .field("y", &format_args!("{:x}", y.value()))
                .finish(),
        }
    }
}

impl Add for &ECPoint {
    type Output = ECPoint;

    fn add(self, other: &ECPoint) -> ECPoint {
        ECPoint::add(self, other)
    }
}

impl Neg for &ECPoint {
    type Output = ECPoint;

    fn neg(self) -> ECPoint {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};

    fn curve() -> &'static ECCurve {
        ECCurve::secp256k1()
    }

    #[test]
    fn test_double_generator() {
        let g = curve().generator();
        let two_g = g.double();
        assert_eq!(
            hex::encode(two_g.encode_point(false)),
            "04c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5\
             1ae168fea63dc339a3c58419466ceaeef7f632653266d0e1236431a950cfe52a"
        );
        assert_eq!(&g + &g, two_g);
    }

    #[test]
    fn test_add_generator() {
        let g = curve().generator();
        let three_g = g.double().add(&g);
        assert_eq!(
            hex::encode(three_g.encode_point(true)),
            "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
        assert_eq!(g.add(&g.double()), three_g);
    }

    #[test]
    fn test_identity_and_inverse() {
        let g = curve().generator();
        let inf = curve().infinity();

        assert!(inf.is_infinity());
        assert!(inf.is_on_curve());
        assert_eq!(g.add(&inf), g);
        assert_eq!(inf.add(&g), g);
        assert!(g.add(&-&g).is_infinity());
        assert!(inf.double().is_infinity());
        assert!(inf.negate().is_infinity());
    }

    #[test]
    fn test_multiply_small_scalars() {
        let g = curve().generator();
        assert!(g.multiply(&BigUint::zero()).is_infinity());
        assert_eq!(g.multiply(&BigUint::one()), g);
        assert_eq!(g.multiply(&BigUint::from(2u32)), g.double());
        assert_eq!(g.multiply(&BigUint::from(3u32)), g.double().add(&g));
    }

    #[test]
    fn test_multiply_reduces_by_order() {
        let g = curve().generator();
        let n = curve().n();

        assert!(g.multiply(n).is_infinity());
        assert_eq!(g.multiply(&(n + 1u32)), g);
        assert_eq!(g.multiply(&(n - 1u32)), g.negate());
        assert!(g.multiply_vartime(n).is_infinity());
        assert_eq!(g.multiply_vartime(&(n - 1u32)), g.negate());
    }

    #[test]
    fn test_multiply_matches_vartime() {
        let g = curve().generator();
        let scalars = [
            BigUint::from(7u32),
            BigUint::from(0xdead_beefu32),
            BigUint::from_bytes_be(&hex_literal::hex!(
                "1b7f730fc3ac386a1ae1c2cbaabdd99e3bb85da7d5236f9b1a92bb0b742d30ca"
            )),
        ];
        for k in &scalars {
            assert_eq!(g.multiply(k), g.multiply_vartime(k));
        }
    }

    #[test]
    fn test_multiply_work_is_independent_of_scalar() {
        use crate::ecc::op_counts::measure;

        let g = curve().generator();
        let n = curve().n();
        let scalars = [
            BigUint::one(),
            BigUint::from(0xdead_beefu32),
            n - 1u32,
            BigUint::from_bytes_be(&[0x5a; 32]),
        ];

        let counts: Vec<_> = scalars
            .iter()
            .map(|k| measure(|| g.multiply(k)).1)
            .collect();

        assert!(counts.windows(2).all(|w| w[0] == w[1]), "{counts:?}");
        assert_eq!(counts[0].inversions, 0);
        assert_eq!(counts[0].exponentiations, 1);
    }

    #[test]
    fn test_multiply_blinding_does_not_change_result() {
        use rand::SeedableRng;

        let g = curve().generator();
        let k = BigUint::from_bytes_be(&[0x5a; 32]);
        let expected = g.multiply_vartime(&k);
        for seed in 0..3 {
            let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
            assert_eq!(g.multiply_with_rng(&k, &mut rng), expected);
        }
    }

    #[test]
    fn test_multiply_non_generator_point() {
        let p = curve().generator().multiply_vartime(&BigUint::from(0x1234_5678u32));
        let k = BigUint::from_bytes_be(&[0xa5; 32]);
        assert_eq!(p.multiply(&k), p.multiply_vartime(&k));
        assert!(p.multiply(curve().n()).is_infinity());
    }

    #[test]
    fn test_multiply_infinity() {
        let inf = curve().infinity();
        assert!(inf.multiply(&BigUint::from(5u32)).is_infinity());
        assert!(inf.multiply_vartime(&BigUint::from(5u32)).is_infinity());
    }

    #[test]
    fn test_encode_decode() {
        let g = curve().generator();
        for compressed in [true, false] {
            let encoded = g.encode_point(compressed);
            assert_eq!(encoded.len(), if compressed { 33 } else { 65 });
            assert_eq!(ECPoint::decode_point(&encoded, curve()).unwrap(), g);
        }

        // odd y takes the 0x03 prefix
        let neg = g.negate();
        let encoded = neg.encode_point(true);
        assert_eq!(encoded[0], 0x03);
        assert_eq!(ECPoint::decode_point(&encoded, curve()).unwrap(), neg);

        let inf = curve().infinity();
        assert_eq!(inf.encode_point(true), vec![0x00]);
        assert!(ECPoint::decode_point(&[0x00], curve()).unwrap().is_infinity());
    }

    #[test]
    fn test_decode_rejects_bad_framing() {
        let g = curve().generator().encode_point(true);

        assert!(matches!(
            ECPoint::decode_point(&[], curve()),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            ECPoint::decode_point(&g[..32], curve()),
            Err(Error::InvalidFormat(_))
        ));

        let mut bad_prefix = g.clone();
        bad_prefix[0] = 0x05;
        assert!(matches!(
            ECPoint::decode_point(&bad_prefix, curve()),
            Err(Error::InvalidFormat(_))
        ));

        let mut wrong_length = vec![0x04];
        wrong_length.extend_from_slice(&g[1..]);
        assert!(matches!(
            ECPoint::decode_point(&wrong_length, curve()),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_rejects_points_off_curve() {
        // x = 5 gives x³ + 7 a quadratic non-residue
        let mut compressed = vec![0x02];
        compressed.extend_from_slice(&[0u8; 31]);
        compressed.push(5);
        assert!(matches!(
            ECPoint::decode_point(&compressed, curve()),
            Err(Error::InvalidKey(_))
        ));

        let mut x_too_large = vec![0x02];
        x_too_large.extend_from_slice(&[0xff; 32]);
        assert!(matches!(
            ECPoint::decode_point(&x_too_large, curve()),
            Err(Error::InvalidKey(_))
        ));

        let mut uncompressed = curve().generator().encode_point(false);
        uncompressed[64] ^= 0x01;
        assert!(matches!(
            ECPoint::decode_point(&uncompressed, curve()),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_from_affine() {
        let g = curve().generator();
        let x = g.x().unwrap().clone();
        let y = g.y().unwrap().clone();
        assert_eq!(ECPoint::from_affine(curve(), x.clone(), y.clone()).unwrap(), g);
        assert!(ECPoint::from_affine(curve(), x, y + 1u32).is_err());
    }
}
