//! Deterministic ECDSA nonces (RFC 6979, HMAC-SHA-256).

use crate::ecc::to_fixed_bytes;
use crate::keys::PrivateKey;
use ecwallet_config::{HASH_SIZE, KEY_SIZE};
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-DRBG state seeded from a private key and a message digest.
///
/// Each call to [`NonceGenerator::next_nonce`] yields the next candidate in
/// `[1, n-1]`; a caller that rejects a candidate simply asks again.
pub(crate) struct NonceGenerator<'a> {
    k: Zeroizing<[u8; HASH_SIZE]>,
    v: Zeroizing<[u8; HASH_SIZE]>,
    n: &'a BigUint,
    reseed: bool,
}

impl<'a> NonceGenerator<'a> {
    pub(crate) fn new(private_key: &PrivateKey, digest: &[u8; HASH_SIZE], n: &'a BigUint) -> Self {
        // bits2octets: the digest reduced modulo n
        let h1 = to_fixed_bytes(&(BigUint::from_bytes_be(digest) % n), KEY_SIZE);
        let x = private_key.as_be_bytes();

        let mut k = Zeroizing::new([0x00u8; HASH_SIZE]);
        let mut v = Zeroizing::new([0x01u8; HASH_SIZE]);

        *k = hmac(k.as_slice(), &[v.as_slice(), &[0x00], x.as_slice(), &h1]);
        *v = hmac(k.as_slice(), &[v.as_slice()]);
        *k = hmac(k.as_slice(), &[v.as_slice(), &[0x01], x.as_slice(), &h1]);
        *v = hmac(k.as_slice(), &[v.as_slice()]);

        Self {
            k,
            v,
            n,
            reseed: false,
        }
    }

    pub(crate) fn next_nonce(&mut self) -> BigUint {
        loop {
            if self.reseed {
                *self.k = hmac(self.k.as_slice(), &[self.v.as_slice(), &[0x00]]);
                *self.v = hmac(self.k.as_slice(), &[self.v.as_slice()]);
            }
            self.reseed = true;

            *self.v = hmac(self.k.as_slice(), &[self.v.as_slice()]);
            let candidate = BigUint::from_bytes_be(self.v.as_slice());
            if !candidate.is_zero() && &candidate < self.n {
                return candidate;
            }
        }
    }
}

fn hmac(key: &[u8], parts: &[&[u8]]) -> [u8; HASH_SIZE] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::ECCurve;
    use crate::hash::sha256;
    use hex_literal::hex;

    fn nonce(key: &[u8], message: &[u8]) -> BigUint {
        let key = PrivateKey::from_slice(key).unwrap();
        let digest = sha256(message);
        NonceGenerator::new(&key, &digest, ECCurve::secp256k1().n()).next_nonce()
    }

    #[test]
    fn test_known_nonces() {
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(
            nonce(&one, b"Satoshi Nakamoto"),
            BigUint::from_bytes_be(&hex!(
                "8f8a276c19f4149656b280621e358cce24f5f52542772691ee69063b74f15d15"
            ))
        );

        let n_minus_one = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");
        assert_eq!(
            nonce(&n_minus_one, b"Satoshi Nakamoto"),
            BigUint::from_bytes_be(&hex!(
                "33a19b60e25fb6f4435af53a3d42d493644827367e6453928554f43e49aa6f90"
            ))
        );
    }

    #[test]
    fn test_successive_nonces_differ() {
        let key = PrivateKey::from_slice(&[0x11; 32]).unwrap();
        let digest = sha256(b"retry");
        let mut generator = NonceGenerator::new(&key, &digest, ECCurve::secp256k1().n());
        let first = generator.next_nonce();
        let second = generator.next_nonce();
        assert_ne!(first, second);
    }
}
