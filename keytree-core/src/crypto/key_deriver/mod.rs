// keytree-core/src/crypto/key_deriver/mod.rs
//
// Key Derivation Engine - Multi-Curve Support
//
// Kiến trúc:
// ┌──────────────────────────────────────────────────────────┐
// │  Seed (BIP-39 hoặc raw bytes)                            │
// │                       │                                  │
// │      ┌────────────────┼──────────────────┐               │
// │      ▼                ▼                  ▼               │
// │  secp256k1        nist256p1          ed25519             │
// │  (BIP-32)         (SLIP-0010)        (SLIP-0010,         │
// │  ├─ EVM           ├─ FIDO/PIV         hardened-only)     │
// │  ├─ Bitcoin       └─ NIST chains     ├─ Solana           │
// │  └─ Cosmos                           └─ Aptos, Sui, ...  │
// └──────────────────────────────────────────────────────────┘

pub mod ed25519;
pub mod nistp256;
pub mod secp256k1;

// Re-exports
pub use ed25519::Ed25519Deriver;
pub use nistp256::NistP256Deriver;
pub use secp256k1::Secp256k1Deriver;

use crate::crypto::paths::{self, DerivationPath, HARDENED_OFFSET};
use crate::error::{CryptoError, PathError, WalletError, WalletResult};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::fmt;
use zeroize::Zeroizing;

pub(crate) type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 over concatenated parts, output trong buffer tự zeroize.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> WalletResult<Zeroizing<[u8; 64]>> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|e| {
        WalletError::Crypto(CryptoError::DerivationFailed(format!(
            "HMAC init failed: {}",
            e
        )))
    })?;
    for part in parts {
        mac.update(part);
    }
    let digest = mac.finalize().into_bytes();

    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&digest);
    Ok(out)
}

// =============================================================================
// COMMON TYPES
// =============================================================================
/// Curve type cho key derivation. Ba curve cố định, biết ở compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    /// secp256k1 — Bitcoin, Ethereum, Tron, Cosmos, ...
    Secp256k1,
    /// NIST P-256 (secp256r1) — FIDO, PIV, một số NIST chains
    NistP256,
    /// Ed25519 — Solana, Aptos, Sui, Near, TON, ...
    Ed25519,
}

impl CurveType {
    /// ASCII key cho master HMAC, theo SLIP-0010
    pub const fn seed_key(self) -> &'static [u8] {
        match self {
            CurveType::Secp256k1 => b"Bitcoin seed",
            CurveType::NistP256 => b"Nist256p1 seed",
            CurveType::Ed25519 => b"ed25519 seed",
        }
    }

    /// Weierstrass curves có scalar arithmetic + compressed/uncompressed keys
    pub const fn is_weierstrass(self) -> bool {
        !matches!(self, CurveType::Ed25519)
    }
}

/// Kết quả derivation: private key + chain code, auto-zeroize khi drop.
pub struct DerivedKey {
    /// Private key bytes (32 bytes)
    pub private_key: Zeroizing<[u8; 32]>,
    /// Chain code (32 bytes) — secret material, threading entropy qua các level
    pub chain_code: Zeroizing<[u8; 32]>,
    /// Curve type
    pub curve: CurveType,
}

// Custom Debug - KHÔNG BAO GIỜ hiển thị key material
impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("curve", &self.curve)
            .field("private_key", &"[REDACTED]")
            .field("chain_code", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// UNIFIED DERIVER
// =============================================================================
/// Unified Key Deriver - Entry point cho mọi loại key derivation
///
/// Master derivation và path walking cho cả ba curve; per-curve logic nằm
/// trong `Secp256k1Deriver` / `NistP256Deriver` / `Ed25519Deriver`.
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derive master key + chain code từ seed.
    ///
    /// Seed là opaque bytes — không kiểm tra độ dài (SLIP-0010 vectors dùng
    /// seed 16 bytes, BIP-39 sinh ra 64 bytes).
    pub fn derive_master(curve: CurveType, seed: &[u8]) -> WalletResult<DerivedKey> {
        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        Self::master_into(curve, seed, &mut *private_key, &mut *chain_code)?;
        Ok(DerivedKey {
            private_key,
            chain_code,
            curve,
        })
    }

    /// Derive theo path indices. Yêu cầu ít nhất 1 index.
    ///
    /// Walk là iterative, reuse buffer in-place; sau bước cuối buffer chứa
    /// terminal child.
    pub fn derive_path(
        curve: CurveType,
        seed: &[u8],
        path: &DerivationPath,
    ) -> WalletResult<DerivedKey> {
        if path.is_empty() {
            return Err(WalletError::Path(PathError::Empty));
        }

        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        Self::master_into(curve, seed, &mut *private_key, &mut *chain_code)?;
        for &index in path.indices() {
            Self::child_into(curve, &mut *private_key, &mut *chain_code, index)?;
        }
        Ok(DerivedKey {
            private_key,
            chain_code,
            curve,
        })
    }

    /// Derive theo path string (e.g. `"m/44'/60'/0'/0/0"`).
    pub fn derive_path_str(curve: CurveType, seed: &[u8], path: &str) -> WalletResult<DerivedKey> {
        let path = DerivationPath::parse(path)?;
        Self::derive_path(curve, seed, &path)
    }

    /// Batch fan-out: derive tới base path 1 lần, rồi derive từng index.
    ///
    /// Hiệu quả hơn N lần `derive_path` vì master → base chỉ tính 1 lần.
    /// Với ed25519 index được harden tự động (SLIP-0010 bắt buộc); với
    /// Weierstrass curves fan-out là normal derivation.
    pub fn derive_batch(
        curve: CurveType,
        seed: &[u8],
        base_path: &DerivationPath,
        indices: std::ops::Range<u32>,
    ) -> WalletResult<Vec<DerivedKey>> {
        let base = Self::derive_path(curve, seed, base_path)?;

        let mut keys = Vec::with_capacity(indices.len());
        for raw in indices {
            if raw >= HARDENED_OFFSET {
                return Err(WalletError::Path(PathError::IndexOutOfRange(raw)));
            }
            let index = match curve {
                CurveType::Ed25519 => raw | HARDENED_OFFSET,
                _ => raw,
            };

            let mut private_key = base.private_key.clone();
            let mut chain_code = base.chain_code.clone();
            Self::child_into(curve, &mut *private_key, &mut *chain_code, index)?;
            keys.push(DerivedKey {
                private_key,
                chain_code,
                curve,
            });
        }
        Ok(keys)
    }

    // =========================================================================
    // TRY FORMS — boolean + out-parameter, không raise
    // =========================================================================

    /// Out-parameter form của [`derive_master`](Self::derive_master).
    ///
    /// Cả 2 buffer phải đúng 32 bytes; mismatch trả về `false`, không ghi gì.
    pub fn try_derive_master(
        curve: CurveType,
        seed: &[u8],
        private_key_out: &mut [u8],
        chain_code_out: &mut [u8],
    ) -> bool {
        if private_key_out.len() != 32 || chain_code_out.len() != 32 {
            return false;
        }
        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        if Self::master_into(curve, seed, &mut *private_key, &mut *chain_code).is_err() {
            return false;
        }
        private_key_out.copy_from_slice(&private_key[..]);
        chain_code_out.copy_from_slice(&chain_code[..]);
        true
    }

    /// Out-parameter form của [`derive_path`](Self::derive_path).
    pub fn try_derive_path(
        curve: CurveType,
        seed: &[u8],
        path: &DerivationPath,
        private_key_out: &mut [u8],
        chain_code_out: &mut [u8],
    ) -> bool {
        if private_key_out.len() != 32 || chain_code_out.len() != 32 {
            return false;
        }
        match Self::derive_path(curve, seed, path) {
            Ok(derived) => {
                private_key_out.copy_from_slice(&derived.private_key[..]);
                chain_code_out.copy_from_slice(&derived.chain_code[..]);
                true
            }
            Err(_) => false,
        }
    }

    /// Out-parameter form của [`derive_path_str`](Self::derive_path_str).
    ///
    /// Parse segment-by-segment và walk streaming — không allocate, kể cả
    /// cho path dài tùy ý.
    pub fn try_derive_path_str(
        curve: CurveType,
        seed: &[u8],
        path: &str,
        private_key_out: &mut [u8],
        chain_code_out: &mut [u8],
    ) -> bool {
        if private_key_out.len() != 32 || chain_code_out.len() != 32 {
            return false;
        }

        let rest = match paths::split_prefix(path) {
            Ok(Some(rest)) => rest,
            // "m" — path rỗng không hợp lệ ở đây
            Ok(None) | Err(()) => return false,
        };

        let mut private_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        if Self::master_into(curve, seed, &mut *private_key, &mut *chain_code).is_err() {
            return false;
        }
        for segment in rest.split('/') {
            let Some(index) = paths::segment_value(segment) else {
                return false;
            };
            if Self::child_into(curve, &mut *private_key, &mut *chain_code, index).is_err() {
                return false;
            }
        }

        private_key_out.copy_from_slice(&private_key[..]);
        chain_code_out.copy_from_slice(&chain_code[..]);
        true
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    fn master_into(
        curve: CurveType,
        seed: &[u8],
        private_key: &mut [u8; 32],
        chain_code: &mut [u8; 32],
    ) -> WalletResult<()> {
        match curve {
            CurveType::Secp256k1 => {
                Secp256k1Deriver::master_from_seed(seed, private_key, chain_code)
            }
            CurveType::NistP256 => NistP256Deriver::master_from_seed(seed, private_key, chain_code),
            CurveType::Ed25519 => Ed25519Deriver::master_from_seed(seed, private_key, chain_code),
        }
    }

    fn child_into(
        curve: CurveType,
        private_key: &mut [u8; 32],
        chain_code: &mut [u8; 32],
        index: u32,
    ) -> WalletResult<()> {
        match curve {
            CurveType::Secp256k1 => Secp256k1Deriver::derive_child(private_key, chain_code, index),
            CurveType::NistP256 => NistP256Deriver::derive_child(private_key, chain_code, index),
            CurveType::Ed25519 => Ed25519Deriver::derive_child(private_key, chain_code, index),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
