//! Base58 and Base58Check with the Bitcoin alphabet.
//!
//! Base58Check appends the first four bytes of `SHA-256(SHA-256(payload))`
//! before encoding. Leading zero bytes map to leading `1` characters and back.

use crate::{Error, Result};
use ecwallet_config::CHECKSUM_SIZE;
use ecwallet_cryptography::hash::{checksum, verify_checksum};

/// Encodes bytes as Base58.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decodes a Base58 string.
pub fn decode(src: &str) -> Result<Vec<u8>> {
    bs58::decode(src).into_vec().map_err(|err| match err {
        bs58::decode::Error::InvalidCharacter { character, index } => {
            Error::InvalidEncoding { character, index }
        }
        bs58::decode::Error::NonAsciiCharacter { index } => Error::InvalidEncoding {
            character: src
                .get(index..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            index,
        },
        other => Error::InvalidFormat(other.to_string()),
    })
}

pub trait ToBase58Check {
    fn to_base58_check(&self) -> String;
}

impl<T: AsRef<[u8]>> ToBase58Check for T {
    fn to_base58_check(&self) -> String {
        let src = self.as_ref();
        let mut buf = Vec::with_capacity(src.len() + CHECKSUM_SIZE);
        buf.extend_from_slice(src);
        buf.extend_from_slice(&checksum(src));
        encode(&buf)
    }
}

pub trait FromBase58Check: Sized {
    /// Decodes a Base58Check string and strips its checksum.
    ///
    /// A non-alphabet character is `InvalidEncoding`, a mismatching checksum
    /// is `InvalidChecksum` and input too short to hold a checksum is
    /// `InvalidFormat`.
    fn from_base58_check(src: &str) -> Result<Self>;
}

impl FromBase58Check for Vec<u8> {
    fn from_base58_check(src: &str) -> Result<Vec<u8>> {
        let mut data = decode(src)?;
        if data.len() < CHECKSUM_SIZE {
            return Err(Error::InvalidFormat(format!(
                "base58check payload is {} bytes, shorter than its checksum",
                data.len()
            )));
        }

        let split = data.len() - CHECKSUM_SIZE;
        if !verify_checksum(&data[..split], &data[split..]) {
            return Err(Error::InvalidChecksum);
        }

        data.truncate(split);
        Ok(data)
    }
}
