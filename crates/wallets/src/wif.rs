//! Wallet Import Format.
//!
//! A WIF string is `Base58Check(version ‖ key ‖ [0x01])`, where the trailing
//! `0x01` marks a key whose public key is used in compressed form.

use crate::base58::{FromBase58Check, ToBase58Check};
use crate::{Error, Result};
use ecwallet_config::{COMPRESSED_FLAG, KEY_SIZE};
use ecwallet_cryptography::PrivateKey;
use tracing::debug;
use zeroize::Zeroizing;

const UNCOMPRESSED_PAYLOAD_SIZE: usize = 1 + KEY_SIZE;
const COMPRESSED_PAYLOAD_SIZE: usize = 1 + KEY_SIZE + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wif {
    version: u8,
    private_key: PrivateKey,
    compressed: bool,
}

impl Wif {
    pub fn new(version: u8, private_key: PrivateKey, compressed: bool) -> Self {
        Self {
            version,
            private_key,
            compressed,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn into_private_key(self) -> PrivateKey {
        self.private_key
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn encode(&self) -> String {
        let mut payload = Zeroizing::new(Vec::with_capacity(COMPRESSED_PAYLOAD_SIZE));
        payload.push(self.version);
        payload.extend_from_slice(self.private_key.as_be_bytes());
        if self.compressed {
            payload.push(COMPRESSED_FLAG);
        }

        payload.to_base58_check()
    }

    /// Decodes a WIF string whose version byte must equal `expected_version`.
    ///
    /// # Errors
    /// - `InvalidEncoding` / `InvalidChecksum` from the Base58Check layer
    /// - `InvalidVersion` when the version byte differs
    /// - `InvalidFormat` when the payload is not 33 or 34 bytes, or the 34th
    ///   byte is not the compression flag
    /// - `Cryptography(InvalidKey)` when the key is zero or not below `n`
    pub fn decode(wif: &str, expected_version: u8) -> Result<Self> {
        let payload = Zeroizing::new(Vec::<u8>::from_base58_check(wif)?);

        let Some(&version) = payload.first() else {
            return Err(Error::InvalidFormat("empty WIF payload".to_string()));
        };
        if version != expected_version {
            return Err(Error::InvalidVersion {
                expected: expected_version,
                actual: version,
            });
        }

        let compressed = match payload.len() {
            UNCOMPRESSED_PAYLOAD_SIZE => false,
            COMPRESSED_PAYLOAD_SIZE => true,
            len => {
                return Err(Error::InvalidFormat(format!(
                    "WIF payload must be {UNCOMPRESSED_PAYLOAD_SIZE} or {COMPRESSED_PAYLOAD_SIZE} bytes, got {len}"
                )))
            }
        };
        if compressed && payload[COMPRESSED_PAYLOAD_SIZE - 1] != COMPRESSED_FLAG {
            return Err(Error::InvalidFormat(format!(
                "invalid compression flag 0x{:02x}",
                payload[COMPRESSED_PAYLOAD_SIZE - 1]
            )));
        }

        let private_key = PrivateKey::from_slice(&payload[1..=KEY_SIZE])?;
        debug!(version, compressed, "decoded WIF");

        Ok(Self {
            version,
            private_key,
            compressed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecwallet_cryptography::Error as CryptoError;

    fn key(last: u8) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[31] = last;
        PrivateKey::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_encode_key_one() {
        assert_eq!(
            Wif::new(0x80, key(1), false).encode(),
            "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
        );
        assert_eq!(
            Wif::new(0x80, key(1), true).encode(),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
        assert_eq!(
            Wif::new(0xef, key(1), true).encode(),
            "cMahea7zqjxrtgAbB7LSGbcQUr1uX1ojuat9jZodMN87JcbXMTcA"
        );
    }

    #[test]
    fn test_decode_key_one() {
        let wif = Wif::decode("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn", 0x80).unwrap();
        assert_eq!(wif.version(), 0x80);
        assert!(wif.compressed());
        assert_eq!(wif.private_key(), &key(1));

        let wif = Wif::decode("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf", 0x80).unwrap();
        assert!(!wif.compressed());
        assert_eq!(wif.into_private_key(), key(1));
    }

    #[test]
    fn test_decode_wrong_version() {
        assert_eq!(
            Wif::decode("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn", 0xef).unwrap_err(),
            Error::InvalidVersion {
                expected: 0xef,
                actual: 0x80
            }
        );
    }

    #[test]
    fn test_decode_bad_compression_flag() {
        // version ‖ [0x01; 32] ‖ 0x02
        assert!(matches!(
            Wif::decode("KwFfNUhSDaASSAwtG7ssQM1uVX8RgX5GHWnnLfhfiQDigjrnGQjM", 0x80),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_short_payload() {
        // version ‖ [0x01; 31]
        assert!(matches!(
            Wif::decode("yNgvhczaHhtShdwVzdo3BakmqWuuWxf3KNcTbRBHXvDjqpZLy", 0x80),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_out_of_range_key() {
        // zero key
        assert!(matches!(
            Wif::decode("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAbuatmU", 0x80),
            Err(Error::Cryptography(CryptoError::InvalidKey(_)))
        ));
        // key equal to n
        assert!(matches!(
            Wif::decode("5Km2kuu7vtFDPpxywn4u3NLpbr5jKpTB3jsuDU2KYEqetwr388P", 0x80),
            Err(Error::Cryptography(CryptoError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_decode_corrupted_checksum() {
        assert_eq!(
            Wif::decode("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWo", 0x80).unwrap_err(),
            Error::InvalidChecksum
        );
    }
}
