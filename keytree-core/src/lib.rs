//! # keytree-core
//!
//! Hierarchical deterministic (HD) key-derivation engine implementing the
//! BIP-32 / SLIP-0010 / BIP-39 / BIP-44 family of standards.
//!
//! Given a mnemonic sentence (or raw seed) and a textual or numeric
//! derivation path, the engine deterministically produces 32-byte private
//! keys and chain codes for secp256k1, NIST P-256 or ed25519, and exposes a
//! signing / public-key facade per curve family.
//!
//! ```
//! use keytree_core::{CurveType, DerivationPaths, WeierstrassWallet};
//!
//! let wallet = WeierstrassWallet::from_mnemonic(
//!     CurveType::Secp256k1,
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     None,
//!     DerivationPaths::EVM_0,
//! ).unwrap();
//!
//! let signature = wallet.sign(b"hello").unwrap();
//! assert!(wallet.verify(b"hello", &signature));
//! ```
//!
//! Purely synchronous and CPU-bound: no I/O, no internal threads, and no RNG
//! — mnemonics and seeds always come from the caller. Secret buffers are
//! zeroized on drop and never appear in `Debug` output or error messages.

pub mod crypto;
pub mod error;
pub mod wallet;

// Re-exports for cleaner API access
pub use crypto::key_deriver::{CurveType, DerivedKey, KeyDeriver};
pub use crypto::mnemonic::WalletMnemonic;
pub use crypto::paths::{DerivationPath, DerivationPaths, HARDENED_OFFSET};
pub use error::{CryptoError, MnemonicError, PathError, WalletError, WalletResult};
pub use wallet::{EdwardsWallet, WeierstrassWallet};
