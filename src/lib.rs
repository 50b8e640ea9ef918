//! # ecwallet
//!
//! secp256k1 keys, ECDSA signatures and the wallet encodings built on them.
//!
//! The workspace is split into:
//! - [`config`]: protocol sizes and per-network version bytes
//! - [`cryptography`]: field and point arithmetic, keys, the key manager,
//!   ECDSA and hashes
//! - [`wallets`]: Base58Check, WIF, addresses and key pairs
//!
//! ```no_run
//! use ecwallet::prelude::*;
//!
//! let config = WalletConfig::for_network(NetworkType::MainNet);
//! let key_pair = KeyPair::generate(true)?;
//! println!("{} {}", key_pair.address(&config), key_pair.to_wif(&config));
//!
//! let digest = sha256(b"message");
//! let signature = key_pair.sign(&digest)?;
//! assert!(verify(&digest, &signature, key_pair.public_key()));
//! # Ok::<(), ecwallet::wallets::Error>(())
//! ```

pub mod logging;

pub use ecwallet_config as config;
pub use ecwallet_cryptography as cryptography;
pub use ecwallet_wallets as wallets;

/// Commonly used types
pub mod prelude {
    pub use crate::logging::{init_logging, LogConfig, LogFormat};
    pub use ecwallet_config::{NetworkType, WalletConfig};
    pub use ecwallet_cryptography::hash::{hash160, sha256};
    pub use ecwallet_cryptography::{
        sign, verify, ECCurve, ECPoint, KeyManager, PrivateKey, PublicKey, Signature,
    };
    pub use ecwallet_wallets::{Address, KeyPair, Wif};
}
