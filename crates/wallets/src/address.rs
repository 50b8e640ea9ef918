//! Pay-to-public-key-hash addresses.

use crate::base58::{FromBase58Check, ToBase58Check};
use crate::{Error, Result};
use ecwallet_config::ADDRESS_HASH_SIZE;
use ecwallet_cryptography::{hash::hash160, PublicKey};
use std::fmt;
use tracing::debug;

/// An address: a version byte and the Hash160 of a serialized public key.
///
/// The text form is `Base58Check(version ‖ hash160)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    version: u8,
    hash: [u8; ADDRESS_HASH_SIZE],
}

impl Address {
    pub fn new(version: u8, hash: [u8; ADDRESS_HASH_SIZE]) -> Self {
        Self { version, hash }
    }

    /// Hashes serialized public key bytes as given.
    ///
    /// The compressed and uncompressed forms of one key give different addresses.
    pub fn from_public_key_bytes(public_key: &[u8], version: u8) -> Self {
        Self::new(version, hash160(public_key))
    }

    pub fn from_public_key(public_key: &PublicKey, compressed: bool, version: u8) -> Self {
        Self::from_public_key_bytes(&public_key.to_sec1_bytes(compressed), version)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hash(&self) -> &[u8; ADDRESS_HASH_SIZE] {
        &self.hash
    }

    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(1 + ADDRESS_HASH_SIZE);
        payload.push(self.version);
        payload.extend_from_slice(&self.hash);
        payload.to_base58_check()
    }

    /// Parses an address, checking its checksum, version byte and hash length.
    pub fn decode(address: &str, expected_version: u8) -> Result<Self> {
        let payload = Vec::<u8>::from_base58_check(address)?;
        if payload.len() != 1 + ADDRESS_HASH_SIZE {
            return Err(Error::InvalidFormat(format!(
                "address payload must be {} bytes, got {}",
                1 + ADDRESS_HASH_SIZE,
                payload.len()
            )));
        }

        let version = payload[0];
        if version != expected_version {
            return Err(Error::InvalidVersion {
                expected: expected_version,
                actual: version,
            });
        }

        let mut hash = [0u8; ADDRESS_HASH_SIZE];
        hash.copy_from_slice(&payload[1..]);
        debug!(version, "decoded address");
        Ok(Self { version, hash })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const G_COMPRESSED: [u8; 33] =
        hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");

    #[test]
    fn test_address_of_generator() {
        let address = Address::from_public_key_bytes(&G_COMPRESSED, 0x00);
        assert_eq!(
            address.hash(),
            &hex!("751e76e8199196d454941c45d1b3a323f1433bd6")
        );
        assert_eq!(address.to_string(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");

        let testnet = Address::from_public_key_bytes(&G_COMPRESSED, 0x6f);
        assert_eq!(testnet.to_string(), "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r");
    }

    #[test]
    fn test_decode() {
        let address = Address::decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", 0x00).unwrap();
        assert_eq!(address, Address::from_public_key_bytes(&G_COMPRESSED, 0x00));
    }

    #[test]
    fn test_decode_wrong_version() {
        assert_eq!(
            Address::decode("mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r", 0x00).unwrap_err(),
            Error::InvalidVersion {
                expected: 0x00,
                actual: 0x6f
            }
        );
    }

    #[test]
    fn test_decode_wrong_length() {
        // version ‖ [0x00; 19]
        assert!(matches!(
            Address::decode("111111111111111111117K4nzc", 0x00),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_bad_checksum() {
        assert_eq!(
            Address::decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMJ", 0x00).unwrap_err(),
            Error::InvalidChecksum
        );
    }
}
