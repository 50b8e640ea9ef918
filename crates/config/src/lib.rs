//! ecwallet Configuration Module
//!
//! This module provides the protocol constants and the network configuration
//! used when encoding keys and addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Size of a private key or field coordinate in bytes
pub const KEY_SIZE: usize = 32;
/// Size of a message digest (SHA-256) in bytes
pub const HASH_SIZE: usize = 32;
/// Size of an address hash (Hash160) in bytes
pub const ADDRESS_HASH_SIZE: usize = 20;
/// Size of a Base58Check checksum in bytes
pub const CHECKSUM_SIZE: usize = 4;
/// Size of a SEC1 compressed public key
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 1 + KEY_SIZE;
/// Size of a SEC1 uncompressed public key
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 1 + 2 * KEY_SIZE;
/// Size of a fixed-width `r || s` signature
pub const SIGNATURE_SIZE: usize = 2 * KEY_SIZE;
/// Trailing WIF byte marking a key whose public key is used compressed
pub const COMPRESSED_FLAG: u8 = 0x01;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown network type: {0}")]
    UnknownNetwork(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Network the encoded keys and addresses belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[default]
    MainNet,
    TestNet,
}

impl NetworkType {
    /// Gets the WIF version byte
    pub fn wif_version(&self) -> u8 {
        match self {
            NetworkType::MainNet => 0x80,
            NetworkType::TestNet => 0xef,
        }
    }

    /// Gets the address version byte
    pub fn address_version(&self) -> u8 {
        match self {
            NetworkType::MainNet => 0x00,
            NetworkType::TestNet => 0x6f,
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::MainNet => write!(f, "mainnet"),
            NetworkType::TestNet => write!(f, "testnet"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkType::MainNet),
            "testnet" | "test" => Ok(NetworkType::TestNet),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

/// Wallet encoding configuration.
///
/// The version bytes default to the ones of `network`; an explicit value
/// overrides the network default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    pub network: NetworkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wif_version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_version: Option<u8>,
}

impl WalletConfig {
    /// Creates the configuration for a network with its default version bytes.
    pub fn for_network(network: NetworkType) -> Self {
        Self {
            network,
            wif_version: None,
            address_version: None,
        }
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Version byte prepended to WIF payloads
    pub fn wif_version(&self) -> u8 {
        self.wif_version.unwrap_or_else(|| self.network.wif_version())
    }

    /// Version byte prepended to address payloads
    pub fn address_version(&self) -> u8 {
        self.address_version.unwrap_or_else(|| self.network.address_version())
    }
}

impl From<NetworkType> for WalletConfig {
    fn from(network: NetworkType) -> Self {
        Self::for_network(network)
    }
}
