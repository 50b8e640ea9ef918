//! A private key together with its public key and compression preference.

use crate::{Address, Result, Wif};
use ecwallet_config::{WalletConfig, HASH_SIZE};
use ecwallet_cryptography::{ecdsa, KeyManager, PrivateKey, PublicKey, Signature};
use std::fmt;

/// A key pair as handled by a wallet.
///
/// The compression flag selects which SEC1 form of the public key is hashed
/// into the address and is carried through WIF.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
    compressed: bool,
}

impl KeyPair {
    pub fn new(private_key: PrivateKey, compressed: bool) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
            compressed,
        }
    }

    /// Generates a new key pair using the operating system's CSPRNG.
    pub fn generate(compressed: bool) -> Result<Self> {
        Ok(Self::new(PrivateKey::random()?, compressed))
    }

    /// Creates a key pair from a raw 32-byte private key.
    pub fn from_private_key(private_key: &[u8], compressed: bool) -> Result<Self> {
        Ok(Self::new(PrivateKey::from_slice(private_key)?, compressed))
    }

    /// Imports a WIF string using the configured WIF version.
    pub fn from_wif(wif: &str, config: &WalletConfig) -> Result<Self> {
        let wif = Wif::decode(wif, config.wif_version())?;
        let compressed = wif.compressed();
        Ok(Self::new(wif.into_private_key(), compressed))
    }

    /// Exports the private key as WIF using the configured WIF version.
    pub fn to_wif(&self, config: &WalletConfig) -> String {
        Wif::new(config.wif_version(), self.private_key.clone(), self.compressed).encode()
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The SEC1 public key in the form selected by the compression flag.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.to_sec1_bytes(self.compressed)
    }

    pub fn address(&self, config: &WalletConfig) -> Address {
        Address::from_public_key_bytes(&self.public_key_bytes(), config.address_version())
    }

    pub fn key_manager(&self) -> KeyManager {
        KeyManager::PrivateKeySet {
            private_key: self.private_key.clone(),
            public_key: self.public_key.clone(),
        }
    }

    /// Signs a 32-byte digest with a deterministic nonce.
    pub fn sign(&self, digest: &[u8; HASH_SIZE]) -> Result<Signature> {
        Ok(ecdsa::sign(digest, &self.private_key)?)
    }

    pub fn verify(&self, digest: &[u8; HASH_SIZE], signature: &Signature) -> bool {
        ecdsa::verify(digest, signature, &self.public_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.public_key, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecwallet_config::NetworkType;

    #[test]
    fn test_key_manager_holds_both_keys() {
        let pair = KeyPair::from_private_key(&[0x01; 32], true).unwrap();
        let manager = pair.key_manager();
        assert_eq!(manager.private_key().unwrap(), pair.private_key());
        assert_eq!(manager.public_key().unwrap(), pair.public_key());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let pair = KeyPair::from_private_key(&[0x01; 32], true).unwrap();
        let debug = format!("{pair:?}");
        assert!(debug.contains("031b84c5567b126440995d3ed5aaba0565d71e1834604819ff9c17f5e9d5dd078f"));
        assert!(!debug.contains("0101010101010101"));
    }

    #[test]
    fn test_testnet_round_trip() {
        let config = WalletConfig::for_network(NetworkType::TestNet);
        let pair = KeyPair::from_private_key(&[0x01; 32], true).unwrap();
        let wif = pair.to_wif(&config);
        assert_eq!(wif, "cMceqPhHedrhbcR9eXgzmfWy7kRqLyAxMYwFT6ABDWsiwUp9Nsq9");
        assert_eq!(KeyPair::from_wif(&wif, &config).unwrap(), pair);
    }
}
