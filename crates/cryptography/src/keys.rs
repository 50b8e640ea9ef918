//! secp256k1 private and public keys.

use crate::ecc::{to_fixed_bytes, ECCurve, ECPoint};
use crate::{Error, Result};
use ecwallet_config::{COMPRESSED_PUBLIC_KEY_SIZE, KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::Zeroizing;

/// Upper bound on rejection-sampling rounds when drawing a private key.
///
/// A healthy generator is rejected with probability below 2⁻¹²⁷ per round.
const MAX_KEY_GEN_ATTEMPTS: usize = 1000;

/// A secp256k1 private key: a scalar in `[1, n-1]` stored as 32 big-endian bytes.
///
/// The bytes are wiped on drop and never appear in `Debug` output.
#[derive(Clone)]
pub struct PrivateKey {
    key: Zeroizing<[u8; KEY_SIZE]>,
}

impl PrivateKey {
    /// Imports a raw 32-byte big-endian key.
    ///
    /// Wrong lengths are `InvalidFormat`; zero or values `≥ n` are `InvalidKey`.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != KEY_SIZE {
            return Err(Error::invalid_format(format!(
                "private key must be {KEY_SIZE} bytes, got {}",
                slice.len()
            )));
        }

        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        key.copy_from_slice(slice);
        Self::from_bytes(key)
    }

    /// Builds a key from a scalar, which must lie in `[1, n-1]`.
    pub fn from_scalar(scalar: &BigUint) -> Result<Self> {
        if !is_valid_scalar(scalar) {
            return Err(Error::invalid_key("private key is out of range"));
        }

        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        key.copy_from_slice(&Zeroizing::new(to_fixed_bytes(scalar, KEY_SIZE)));
        Ok(Self { key })
    }

    fn from_bytes(key: Zeroizing<[u8; KEY_SIZE]>) -> Result<Self> {
        if !is_valid_scalar(&BigUint::from_bytes_be(key.as_slice())) {
            return Err(Error::invalid_key("private key is out of range"));
        }
        Ok(Self { key })
    }

    /// Draws a uniformly random key from `rng` by rejection sampling.
    ///
    /// Candidates equal to zero or not below `n` are discarded and redrawn,
    /// never reduced.
    ///
    /// # Errors
    /// Returns `KeyGeneration` if no candidate is accepted within
    /// `MAX_KEY_GEN_ATTEMPTS` rounds, which only happens with a broken generator.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        for attempt in 1..=MAX_KEY_GEN_ATTEMPTS {
            let mut candidate = Zeroizing::new([0u8; KEY_SIZE]);
            rng.fill_bytes(candidate.as_mut());
            match Self::from_bytes(candidate) {
                Ok(key) => return Ok(key),
                Err(_) => warn!(attempt, "random source produced an out-of-range private key"),
            }
        }

        Err(Error::KeyGeneration(format!(
            "no valid private key after {MAX_KEY_GEN_ATTEMPTS} attempts"
        )))
    }

    /// Draws a random key from the operating system's CSPRNG.
    #[inline]
    pub fn random() -> Result<Self> {
        Self::generate(&mut OsRng)
    }

    /// The key as an integer.
    #[inline]
    pub fn scalar(&self) -> BigUint {
        BigUint::from_bytes_be(self.key.as_slice())
    }

    #[inline]
    pub fn as_be_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    #[inline]
    pub fn to_bytes(&self) -> Zeroizing<[u8; KEY_SIZE]> {
        self.key.clone()
    }

    /// Derives the public key `d·G` with constant-time multiplication.
    pub fn public_key(&self) -> PublicKey {
        let curve = ECCurve::secp256k1();
        let point = curve.generator().multiply(&self.scalar());
        debug_assert!(!point.is_infinity());
        PublicKey { point }
    }
}

fn is_valid_scalar(scalar: &BigUint) -> bool {
    !scalar.is_zero() && scalar < ECCurve::secp256k1().n()
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&"***").finish()
    }
}

impl Eq for PrivateKey {}

impl PartialEq for PrivateKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key.as_slice().ct_eq(other.key.as_slice()).into()
    }
}

/// A secp256k1 public key: an on-curve point other than infinity.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    point: ECPoint,
}

impl PublicKey {
    /// Wraps a point, rejecting infinity and points off the secp256k1 curve.
    pub fn from_point(point: ECPoint) -> Result<Self> {
        if !std::ptr::eq(point.curve(), ECCurve::secp256k1()) {
            return Err(Error::invalid_key("public key is not on secp256k1"));
        }
        if point.is_infinity() {
            return Err(Error::invalid_key("public key is the point at infinity"));
        }
        if !point.is_on_curve() {
            return Err(Error::invalid_key("point is not on the curve"));
        }
        Ok(Self { point })
    }

    /// Parses a SEC1 encoded key, compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let point = ECPoint::decode_point(bytes, ECCurve::secp256k1())?;
        Self::from_point(point)
    }

    #[inline]
    pub fn point(&self) -> &ECPoint {
        &self.point
    }

    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        let mut buf = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        buf.copy_from_slice(&self.point.encode_point(false));
        buf
    }

    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        let mut buf = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        buf.copy_from_slice(&self.point.encode_point(true));
        buf
    }

    #[inline]
    pub fn to_sec1_bytes(&self, compressed: bool) -> Vec<u8> {
        self.point.encode_point(compressed)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("compressed", &hex::encode(self.to_compressed()))
            .finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_compressed()))
    }
}
