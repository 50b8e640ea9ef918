//! Key holder with an explicit state.
//!
//! A [`KeyManager`] is either empty, holds a private key together with its
//! derived public key, or holds only a public key. Every transition builds a
//! new value, so a failed import never disturbs a manager that already holds
//! keys.

use crate::ecdsa::{self, Signature};
use crate::keys::{PrivateKey, PublicKey};
use crate::{Error, Result};
use ecwallet_config::{
    COMPRESSED_PUBLIC_KEY_SIZE, HASH_SIZE, KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE,
};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;
use zeroize::Zeroizing;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyManager {
    /// No key material.
    #[default]
    Empty,
    /// A private key and the public key derived from it.
    PrivateKeySet {
        private_key: PrivateKey,
        public_key: PublicKey,
    },
    /// A public key without its private key, e.g. for verification only.
    PublicKeyOnly { public_key: PublicKey },
}

impl KeyManager {
    pub fn new() -> Self {
        Self::Empty
    }

    /// Holds `private_key` and derives its public key.
    pub fn with_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        debug!(public_key = %public_key, "private key set");
        Self::PrivateKeySet {
            private_key,
            public_key,
        }
    }

    /// Generates a private key with the operating system's CSPRNG.
    pub fn generate_random_private_key() -> Result<Self> {
        Self::generate_random_private_key_with(&mut OsRng)
    }

    pub fn generate_random_private_key_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        Ok(Self::with_private_key(PrivateKey::generate(rng)?))
    }

    /// Sets the private key from a scalar in `[1, n-1]`.
    pub fn set_private_key(scalar: &BigUint) -> Result<Self> {
        Ok(Self::with_private_key(PrivateKey::from_scalar(scalar)?))
    }

    /// Imports a raw 32-byte big-endian private key.
    pub fn import_private_key(bytes: &[u8]) -> Result<Self> {
        Ok(Self::with_private_key(PrivateKey::from_slice(bytes)?))
    }

    /// Imports a SEC1 public key, compressed or uncompressed.
    pub fn import_public_key(bytes: &[u8]) -> Result<Self> {
        let public_key = PublicKey::from_sec1_bytes(bytes)?;
        debug!(public_key = %public_key, "public key imported");
        Ok(Self::PublicKeyOnly { public_key })
    }

    pub fn has_private_key(&self) -> bool {
        matches!(self, Self::PrivateKeySet { .. })
    }

    pub fn private_key(&self) -> Result<&PrivateKey> {
        match self {
            Self::PrivateKeySet { private_key, .. } => Ok(private_key),
            _ => Err(Error::NoPrivateKey),
        }
    }

    pub fn public_key(&self) -> Result<&PublicKey> {
        match self {
            Self::PrivateKeySet { public_key, .. } | Self::PublicKeyOnly { public_key } => {
                Ok(public_key)
            }
            Self::Empty => Err(Error::NoPublicKey),
        }
    }

    pub fn export_private_key(&self) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
        Ok(self.private_key()?.to_bytes())
    }

    pub fn export_public_key(&self) -> Result<[u8; UNCOMPRESSED_PUBLIC_KEY_SIZE]> {
        Ok(self.public_key()?.to_uncompressed())
    }

    pub fn export_public_key_compressed(&self) -> Result<[u8; COMPRESSED_PUBLIC_KEY_SIZE]> {
        Ok(self.public_key()?.to_compressed())
    }

    /// Signs a digest with the held private key.
    pub fn sign_hash(&self, digest: &[u8; HASH_SIZE]) -> Result<Signature> {
        ecdsa::sign(digest, self.private_key()?)
    }

    /// Verifies a signature against the held public key.
    pub fn verify_signature(&self, digest: &[u8; HASH_SIZE], signature: &Signature) -> Result<bool> {
        Ok(ecdsa::verify(digest, signature, self.public_key()?))
    }
}
