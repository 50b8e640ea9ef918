//! Hash functions used by the key and address encodings.
//!
//! This module provides SHA-256, RIPEMD-160 and the two chained constructions
//! built from them: Hash160 for addresses and Hash256 for checksums.

use ecwallet_config::{ADDRESS_HASH_SIZE, CHECKSUM_SIZE, HASH_SIZE};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Computes SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; ADDRESS_HASH_SIZE] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes Hash160 (RIPEMD-160 of SHA-256) of the input data.
/// This is the hash committed to by wallet addresses.
pub fn hash160(data: &[u8]) -> [u8; ADDRESS_HASH_SIZE] {
    let sha256_hash = sha256(data);
    ripemd160(&sha256_hash)
}

/// Computes Hash256 (double SHA-256) of the input data.
pub fn hash256(data: &[u8]) -> [u8; HASH_SIZE] {
    let first_hash = sha256(data);
    sha256(&first_hash)
}

/// Computes the Base58Check checksum: the first four bytes of Hash256.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let hash = hash256(data);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Verifies a Base58Check checksum.
pub fn verify_checksum(data: &[u8], checksum_bytes: &[u8]) -> bool {
    checksum(data)[..].ct_eq(checksum_bytes).into()
}
