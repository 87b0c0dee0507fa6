// keytree-core/src/wallet/edwards.rs
//
// Edwards Wallet - Ed25519 Signing Facade
//
// Seed/mnemonic + path (all-hardened) → private key → EdDSA signing

use crate::crypto::key_deriver::{CurveType, Ed25519Deriver, KeyDeriver};
use crate::crypto::mnemonic::WalletMnemonic;
use crate::crypto::paths::DerivationPath;
use crate::error::{CryptoError, WalletError, WalletResult};
use zeroize::Zeroizing;

/// Edwards Wallet — Ed25519
///
/// # Security Architecture
/// - **Write-once keys**: Private key materialize 1 lần lúc khởi tạo
/// - **Zeroize**: Private key tự động ghi đè bằng 0 khi Drop
/// - **No Debug Leak**: Custom Debug impl không hiển thị private key
///
/// Mọi index trong derivation path PHẢI hardened (SLIP-0010).
pub struct EdwardsWallet {
    private_key: Zeroizing<[u8; 32]>,
    public_key: [u8; 32],
}

// Custom Debug - KHÔNG BAO GIỜ hiển thị private key
impl std::fmt::Debug for EdwardsWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdwardsWallet")
            .field("private_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl EdwardsWallet {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Khởi tạo wallet từ private key có sẵn (32 bytes, mọi giá trị hợp lệ)
    pub fn from_private_key(private_key: &[u8]) -> WalletResult<Self> {
        if private_key.len() != 32 {
            return Err(WalletError::Crypto(CryptoError::BufferTooSmall {
                expected: 32,
                actual: private_key.len(),
            }));
        }

        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(private_key);
        let public_key = Ed25519Deriver::public_key(&key);

        Ok(Self {
            private_key: key,
            public_key,
        })
    }

    /// Khởi tạo từ seed + path indices (all-hardened)
    pub fn from_seed(seed: &[u8], path: &DerivationPath) -> WalletResult<Self> {
        let derived = KeyDeriver::derive_path(CurveType::Ed25519, seed, path)?;
        Self::from_private_key(&derived.private_key[..])
    }

    /// Khởi tạo từ seed + path string
    pub fn from_seed_str(seed: &[u8], path: &str) -> WalletResult<Self> {
        let path = DerivationPath::parse(path)?;
        Self::from_seed(seed, &path)
    }

    /// Khởi tạo từ mnemonic + passphrase + path string
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>, path: &str) -> WalletResult<Self> {
        let path = DerivationPath::parse(path)?;
        Self::from_mnemonic_path(phrase, passphrase, &path)
    }

    /// Khởi tạo từ mnemonic + passphrase + path indices
    pub fn from_mnemonic_path(
        phrase: &str,
        passphrase: Option<&str>,
        path: &DerivationPath,
    ) -> WalletResult<Self> {
        let mnemonic = WalletMnemonic::from_phrase(phrase)?;
        let seed = mnemonic.to_seed_bytes(passphrase);
        Self::from_seed(&seed[..], path)
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    #[inline]
    pub const fn curve(&self) -> CurveType {
        CurveType::Ed25519
    }

    /// Ed25519 public key (32 bytes)
    #[inline]
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    // =========================================================================
    // SIGNING
    // =========================================================================

    /// EdDSA sign — 64 bytes
    pub fn sign(&self, data: &[u8]) -> [u8; 64] {
        Ed25519Deriver::sign(&self.private_key, data)
    }

    /// Verify chữ ký với public key của wallet này
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        Ed25519Deriver::verify(&self.public_key, data, signature)
    }

    /// Out-parameter form của [`sign`](Self::sign). `out` phải đúng 64 bytes.
    pub fn try_sign(&self, data: &[u8], out: &mut [u8]) -> bool {
        if out.len() != 64 {
            return false;
        }
        out.copy_from_slice(&self.sign(data));
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
