//! ecwallet Cryptography Library
//!
//! This crate provides the secp256k1 core used by the wallet encodings:
//! - Prime field arithmetic and affine point arithmetic
//! - Constant-time scalar multiplication for secret scalars
//! - Private and public keys with SEC1 encoding
//! - A state-tagged key holder ([`KeyManager`])
//! - ECDSA signing (RFC 6979 nonces, low-S) and verification
//! - SHA-256, RIPEMD-160, Hash160 and Hash256

pub mod ecc;
pub mod ecdsa;
pub mod error;
pub mod hash;
pub mod key_manager;
pub mod keys;
mod rfc6979;

// Re-export main types
pub use ecc::{ECCurve, ECFieldElement, ECPoint};
pub use ecdsa::{sign, sign_with_rng, verify, Signature};
pub use error::{Error, Result};
pub use key_manager::KeyManager;
pub use keys::{PrivateKey, PublicKey};
