// keytree-core/src/wallet/weierstrass.rs
//
// Weierstrass Wallet - secp256k1 / NIST P-256 Signing Facade
//
// Seed/mnemonic + path → private key → ECDSA signing + public key views

use crate::crypto::key_deriver::{CurveType, KeyDeriver, NistP256Deriver, Secp256k1Deriver};
use crate::crypto::mnemonic::WalletMnemonic;
use crate::crypto::paths::DerivationPath;
use crate::error::{CryptoError, WalletError, WalletResult};
use zeroize::Zeroizing;

/// Weierstrass Wallet — secp256k1 hoặc NIST P-256
///
/// # Security Architecture
/// - **Write-once keys**: Private key materialize 1 lần lúc khởi tạo, không mutate
/// - **Zeroize**: Private key tự động ghi đè bằng 0 khi Drop
/// - **No Debug Leak**: Custom Debug impl không hiển thị private key
///
/// # Performance
/// - **Cached Public Keys**: Cả compressed (33B) và uncompressed (65B) được
///   tính 1 lần lúc khởi tạo — Ethereum address cần uncompressed, Cosmos cần
///   compressed; không lặp lại EC multiplication trong signing workload
pub struct WeierstrassWallet {
    curve: CurveType,
    private_key: Zeroizing<[u8; 32]>,
    public_key_compressed: [u8; 33],
    public_key_uncompressed: [u8; 65],
}

// Custom Debug - KHÔNG BAO GIỜ hiển thị private key
impl std::fmt::Debug for WeierstrassWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeierstrassWallet")
            .field("curve", &self.curve)
            .field("private_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl WeierstrassWallet {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Khởi tạo wallet từ private key có sẵn
    ///
    /// # Arguments
    /// * `curve` - `Secp256k1` hoặc `NistP256` (`Ed25519` bị reject —
    ///   dùng `EdwardsWallet`)
    /// * `private_key` - 32 bytes, `1 <= k < n`
    pub fn from_private_key(curve: CurveType, private_key: &[u8]) -> WalletResult<Self> {
        if !curve.is_weierstrass() {
            return Err(WalletError::Crypto(CryptoError::InvalidKeyFormat(
                "ed25519 keys are not Weierstrass keys, use EdwardsWallet".to_string(),
            )));
        }
        if private_key.len() != 32 {
            return Err(WalletError::Crypto(CryptoError::BufferTooSmall {
                expected: 32,
                actual: private_key.len(),
            }));
        }

        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(private_key);

        let (public_key_compressed, public_key_uncompressed) = match curve {
            CurveType::Secp256k1 => (
                Secp256k1Deriver::public_key_compressed(&key)?,
                Secp256k1Deriver::public_key_uncompressed(&key)?,
            ),
            CurveType::NistP256 => (
                NistP256Deriver::public_key_compressed(&key)?,
                NistP256Deriver::public_key_uncompressed(&key)?,
            ),
            // Đã guard ở trên
            CurveType::Ed25519 => {
                return Err(WalletError::Crypto(CryptoError::InvalidCurveInput))
            }
        };

        Ok(Self {
            curve,
            private_key: key,
            public_key_compressed,
            public_key_uncompressed,
        })
    }

    /// Khởi tạo từ seed + path indices
    pub fn from_seed(curve: CurveType, seed: &[u8], path: &DerivationPath) -> WalletResult<Self> {
        let derived = KeyDeriver::derive_path(curve, seed, path)?;
        Self::from_private_key(curve, &derived.private_key[..])
    }

    /// Khởi tạo từ seed + path string
    pub fn from_seed_str(curve: CurveType, seed: &[u8], path: &str) -> WalletResult<Self> {
        let path = DerivationPath::parse(path)?;
        Self::from_seed(curve, seed, &path)
    }

    /// Khởi tạo từ mnemonic + passphrase + path string
    pub fn from_mnemonic(
        curve: CurveType,
        phrase: &str,
        passphrase: Option<&str>,
        path: &str,
    ) -> WalletResult<Self> {
        let path = DerivationPath::parse(path)?;
        Self::from_mnemonic_path(curve, phrase, passphrase, &path)
    }

    /// Khởi tạo từ mnemonic + passphrase + path indices
    pub fn from_mnemonic_path(
        curve: CurveType,
        phrase: &str,
        passphrase: Option<&str>,
        path: &DerivationPath,
    ) -> WalletResult<Self> {
        let mnemonic = WalletMnemonic::from_phrase(phrase)?;
        let seed = mnemonic.to_seed_bytes(passphrase);
        Self::from_seed(curve, &seed[..], path)
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    #[inline]
    pub fn curve(&self) -> CurveType {
        self.curve
    }

    /// Compressed SEC1 public key (33 bytes, prefix 0x02/0x03)
    #[inline]
    pub fn public_key_compressed(&self) -> &[u8; 33] {
        &self.public_key_compressed
    }

    /// Uncompressed SEC1 public key (65 bytes, prefix 0x04)
    #[inline]
    pub fn public_key_uncompressed(&self) -> &[u8; 65] {
        &self.public_key_uncompressed
    }

    // =========================================================================
    // SIGNING
    // =========================================================================

    /// ECDSA sign over SHA-256(data) — 64 bytes `r || s`
    pub fn sign(&self, data: &[u8]) -> WalletResult<[u8; 64]> {
        match self.curve {
            CurveType::Secp256k1 => Secp256k1Deriver::sign(&self.private_key, data),
            CurveType::NistP256 => NistP256Deriver::sign(&self.private_key, data),
            CurveType::Ed25519 => Err(WalletError::Crypto(CryptoError::InvalidCurveInput)),
        }
    }

    /// Recoverable ECDSA sign — 65 bytes `r || s || v`, chỉ secp256k1
    pub fn sign_recoverable(&self, data: &[u8]) -> WalletResult<[u8; 65]> {
        match self.curve {
            CurveType::Secp256k1 => Secp256k1Deriver::sign_recoverable(&self.private_key, data),
            _ => Err(WalletError::Crypto(CryptoError::SigningFailed(
                "recoverable signatures are only supported on secp256k1".to_string(),
            ))),
        }
    }

    /// Verify chữ ký với public key của wallet này
    ///
    /// Chấp nhận 64 bytes (`r || s`) hoặc 65 bytes (recoverable — bỏ byte v).
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let signature = if signature.len() == 65 {
            &signature[..64]
        } else {
            signature
        };
        match self.curve {
            CurveType::Secp256k1 => {
                Secp256k1Deriver::verify(&self.public_key_compressed, data, signature)
            }
            CurveType::NistP256 => {
                NistP256Deriver::verify(&self.public_key_compressed, data, signature)
            }
            CurveType::Ed25519 => false,
        }
    }

    // =========================================================================
    // TRY FORMS — boolean + out-parameter, không raise
    // =========================================================================

    /// Out-parameter form của [`sign`](Self::sign). `out` phải đúng 64 bytes.
    pub fn try_sign(&self, data: &[u8], out: &mut [u8]) -> bool {
        if out.len() != 64 {
            return false;
        }
        match self.sign(data) {
            Ok(signature) => {
                out.copy_from_slice(&signature);
                true
            }
            Err(_) => false,
        }
    }

    /// Out-parameter form của [`sign_recoverable`](Self::sign_recoverable).
    /// `out` phải đúng 65 bytes.
    pub fn try_sign_recoverable(&self, data: &[u8], out: &mut [u8]) -> bool {
        if out.len() != 65 {
            return false;
        }
        match self.sign_recoverable(data) {
            Ok(signature) => {
                out.copy_from_slice(&signature);
                true
            }
            Err(_) => false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
