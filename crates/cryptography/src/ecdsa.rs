//! ECDSA signing and verification over secp256k1.
//!
//! Signatures are produced over a 32-byte message digest. Hashing the message
//! is left to the caller. Nonces are derived deterministically (RFC 6979) by
//! [`sign`]; [`sign_with_rng`] draws them from a CSPRNG instead. Produced
//! signatures are always low-S; [`verify`] accepts either form.

use crate::ecc::{mod_inverse, to_fixed_bytes, ECCurve};
use crate::keys::{PrivateKey, PublicKey};
use crate::rfc6979::NonceGenerator;
use crate::{Error, Result};
use ecwallet_config::{HASH_SIZE, KEY_SIZE, SIGNATURE_SIZE};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use std::fmt;
use tracing::trace;

const DER_SEQUENCE: u8 = 0x30;
const DER_INTEGER: u8 = 0x02;

/// An ECDSA signature `(r, s)`.
///
/// The canonical wire format is 64 bytes: `r` then `s`, each a 32-byte
/// big-endian integer. DER is available as an alternative codec.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Creates a signature from its components.
    ///
    /// Components wider than 32 bytes cannot be encoded and are rejected;
    /// range checks against the curve order happen in [`verify`].
    pub fn new(r: BigUint, s: BigUint) -> Result<Self> {
        let max_bits = (KEY_SIZE * 8) as u64;
        if r.bits() > max_bits || s.bits() > max_bits {
            return Err(Error::invalid_format("signature component exceeds 32 bytes"));
        }
        Ok(Self { r, s })
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Parses the 64-byte `r ‖ s` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(Error::invalid_format(format!(
                "signature must be {SIGNATURE_SIZE} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self {
            r: BigUint::from_bytes_be(&bytes[..KEY_SIZE]),
            s: BigUint::from_bytes_be(&bytes[KEY_SIZE..]),
        })
    }

    /// Serializes to the 64-byte `r ‖ s` form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..KEY_SIZE].copy_from_slice(&to_fixed_bytes(&self.r, KEY_SIZE));
        bytes[KEY_SIZE..].copy_from_slice(&to_fixed_bytes(&self.s, KEY_SIZE));
        bytes
    }

    /// Whether `s ≤ n/2`.
    pub fn is_low_s(&self) -> bool {
        self.s <= half_order()
    }

    /// Returns the equivalent signature with `s` replaced by `n - s` when `s > n/2`.
    pub fn normalize_s(&self) -> Signature {
        let n = ECCurve::secp256k1().n();
        if self.is_low_s() || &self.s >= n {
            return self.clone();
        }
        Signature {
            r: self.r.clone(),
            s: n - &self.s,
        }
    }

    /// Encodes as a DER `SEQUENCE { INTEGER r, INTEGER s }`.
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);

        let mut der = Vec::with_capacity(2 + r.len() + s.len());
        der.push(DER_SEQUENCE);
        der.push((r.len() + s.len()) as u8);
        der.extend_from_slice(&r);
        der.extend_from_slice(&s);
        der
    }

    /// Decodes a strict DER signature.
    ///
    /// Long-form lengths, negative or non-minimal integers and trailing bytes
    /// are rejected.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let body = match der {
            [DER_SEQUENCE, len, body @ ..] if *len < 0x80 && *len as usize == body.len() => body,
            _ => return Err(Error::invalid_format("malformed DER sequence")),
        };

        let (r, rest) = parse_der_integer(body)?;
        let (s, rest) = parse_der_integer(rest)?;
        if !rest.is_empty() {
            return Err(Error::invalid_format("trailing bytes after DER signature"));
        }

        Self::new(r, s)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("r", &format_args!("{:064x}", self.r))
            .field("s", &format_args!("{:064x}", self.s))
            .finish()
    }
}

fn half_order() -> BigUint {
    ECCurve::secp256k1().n() >> 1usize
}

fn der_integer(value: &BigUint) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let pad = bytes[0] & 0x80 != 0;

    let mut out = Vec::with_capacity(3 + bytes.len());
    out.push(DER_INTEGER);
    out.push((bytes.len() + pad as usize) as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(&bytes);
    out
}

fn parse_der_integer(input: &[u8]) -> Result<(BigUint, &[u8])> {
    let (len, rest) = match input {
        [DER_INTEGER, len, rest @ ..] if *len < 0x80 => (*len as usize, rest),
        _ => return Err(Error::invalid_format("expected DER integer")),
    };
    if len == 0 || len > rest.len() {
        return Err(Error::invalid_format("DER integer length out of range"));
    }

    let (content, rest) = rest.split_at(len);
    if content[0] & 0x80 != 0 {
        return Err(Error::invalid_format("negative DER integer"));
    }
    if len > 1 && content[0] == 0x00 && content[1] & 0x80 == 0 {
        return Err(Error::invalid_format("non-minimal DER integer"));
    }

    Ok((BigUint::from_bytes_be(content), rest))
}

/// Signs a 32-byte digest with a deterministic RFC 6979 nonce.
///
/// The same key and digest always give the same signature.
pub fn sign(digest: &[u8; HASH_SIZE], private_key: &PrivateKey) -> Result<Signature> {
    let mut nonces = NonceGenerator::new(private_key, digest, ECCurve::secp256k1().n());
    sign_with_nonce_source(digest, private_key, || Ok(nonces.next_nonce()))
}

/// Signs a 32-byte digest with a nonce drawn uniformly from `rng`.
pub fn sign_with_rng<R: RngCore + CryptoRng>(
    digest: &[u8; HASH_SIZE],
    private_key: &PrivateKey,
    rng: &mut R,
) -> Result<Signature> {
    sign_with_nonce_source(digest, private_key, || {
        Ok(PrivateKey::generate(rng)?.scalar())
    })
}

fn sign_with_nonce_source<F>(
    digest: &[u8; HASH_SIZE],
    private_key: &PrivateKey,
    mut next_nonce: F,
) -> Result<Signature>
where
    F: FnMut() -> Result<BigUint>,
{
    let curve = ECCurve::secp256k1();
    let n = curve.n();
    let generator = curve.generator();
    let e = BigUint::from_bytes_be(digest) % n;
    let d = private_key.scalar();

    loop {
        let k = next_nonce()?;
        let point = generator.multiply(&k);
        let r = match point.x() {
            Some(x) => x % n,
            None => {
                trace!("nonce produced the point at infinity, drawing another");
                continue;
            }
        };
        if r.is_zero() {
            trace!("nonce produced r = 0, drawing another");
            continue;
        }

        // k⁻¹ = k^(n-2) mod n on a fixed exponentiation schedule
        let k_inv = k.modpow(&(n - 2u32), n);
        let s = (k_inv * (&e + &r * &d)) % n;
        if s.is_zero() {
            trace!("nonce produced s = 0, drawing another");
            continue;
        }

        return Ok(Signature { r, s }.normalize_s());
    }
}

/// Verifies a signature over a 32-byte digest.
///
/// Returns `false` for out-of-range components as well as for signatures that
/// do not match; both high-S and low-S forms are accepted.
pub fn verify(digest: &[u8; HASH_SIZE], signature: &Signature, public_key: &PublicKey) -> bool {
    let curve = ECCurve::secp256k1();
    let n = curve.n();
    let (r, s) = (signature.r(), signature.s());

    if r.is_zero() || r >= n || s.is_zero() || s >= n {
        return false;
    }

    let Some(w) = mod_inverse(s, n) else {
        return false;
    };
    let e = BigUint::from_bytes_be(digest) % n;
    let u1 = (&e * &w) % n;
    let u2 = (r * &w) % n;

    let point = curve
        .generator()
        .multiply_vartime(&u1)
        .add(&public_key.point().multiply_vartime(&u2));

    match point.x() {
        Some(x) => &(x % n) == r,
        None => false,
    }
}
