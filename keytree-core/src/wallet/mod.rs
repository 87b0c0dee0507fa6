// keytree-core/src/wallet/mod.rs

//! Signing Wallet Facades
//!
//! Glue layer composing mnemonic → seed → key derivation into ready-to-sign
//! wallets, one per curve family:
//!
//! - **Weierstrass** (secp256k1 / NIST P-256): ECDSA, compressed + uncompressed
//!   public keys cached at construction via [`WeierstrassWallet`].
//! - **Edwards** (ed25519): EdDSA, 32-byte public key via [`EdwardsWallet`].

pub mod edwards;
pub mod weierstrass;

// Re-exports for cleaner API access
pub use edwards::EdwardsWallet;
pub use weierstrass::WeierstrassWallet;
