//! Error types for the cryptography crate.

use thiserror::Error;

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Cryptography errors.
///
/// Messages describe what was wrong with an input and never carry key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("No private key is set")]
    NoPrivateKey,

    #[error("No public key is available")]
    NoPublicKey,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
}

impl Error {
    pub(crate) fn invalid_key(reason: &str) -> Self {
        Error::InvalidKey(reason.to_string())
    }

    pub(crate) fn invalid_format(reason: impl Into<String>) -> Self {
        Error::InvalidFormat(reason.into())
    }
}
