//! ecwallet Wallets Library
//!
//! This crate provides the text encodings used to exchange keys and addresses:
//! - Base58 and Base58Check
//! - Wallet Import Format (WIF) for private keys
//! - Hash160 addresses
//! - [`KeyPair`], which ties a key, its compression flag and its encodings together
//!
//! Version bytes come from [`ecwallet_config::WalletConfig`], so the same code
//! serves main and test networks.

pub mod address;
pub mod base58;
pub mod key_pair;
pub mod wif;

// Re-export main types
pub use address::Address;
pub use base58::{FromBase58Check, ToBase58Check};
pub use key_pair::KeyPair;
pub use wif::Wif;

use thiserror::Error;

/// Result type for wallet encoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wallet encoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid Base58 character '{character}' at index {index}")]
    InvalidEncoding { character: char, index: usize },

    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Invalid version byte: expected 0x{expected:02x}, got 0x{actual:02x}")]
    InvalidVersion { expected: u8, actual: u8 },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Cryptography(#[from] ecwallet_cryptography::Error),
}
