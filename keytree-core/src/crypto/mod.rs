// keytree-core/src/crypto/mod.rs

//! Core Cryptography Module
//!
//! This module implements the fundamental cryptographic operations for an HD key engine:
//!
//! - **Mnemonic Handling**: BIP-39 validation and PBKDF2 seed expansion via [`WalletMnemonic`].
//! - **Key Derivation**: BIP-32 / SLIP-0010 for secp256k1, NIST P-256 and ed25519 via [`KeyDeriver`].
//! - **Derivation Paths**: BIP-44 path codec and pre-defined path builders via [`DerivationPath`] / [`DerivationPaths`].

pub mod key_deriver;
pub mod mnemonic;
pub mod paths;

// Re-exports for cleaner API access
pub use key_deriver::{
    CurveType, DerivedKey, Ed25519Deriver, KeyDeriver, NistP256Deriver, Secp256k1Deriver,
};
pub use mnemonic::WalletMnemonic;
pub use paths::{DerivationPath, DerivationPaths, HARDENED_OFFSET};
