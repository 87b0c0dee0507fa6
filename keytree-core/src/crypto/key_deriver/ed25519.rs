// keytree-core/src/crypto/key_deriver/ed25519.rs
//
// Ed25519 Key Derivation — SLIP-0010 Standard
//
// Dùng cho: Solana, Aptos, Sui, Near, TON, ...
// Algorithm: HMAC-SHA512 (khác BIP-32, chỉ hỗ trợ hardened derivation)
// Reference: https://github.com/satoshilabs/slips/blob/master/slip-0010.md
//
// QUAN TRỌNG: SLIP-0010 cho ed25519 CHỈ hỗ trợ hardened child derivation.
// Index < 2^31 fail ngay với HardenedIndexRequired, ở bất kỳ depth nào.

use crate::crypto::key_deriver::hmac_sha512;
use crate::crypto::paths::is_hardened;
use crate::error::{CryptoError, WalletError, WalletResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Ed25519 Key Deriver — SLIP-0010 Standard
///
/// # Khác biệt với secp256k1 / P-256
/// - Master key seed: "ed25519 seed"
/// - Chỉ hỗ trợ hardened derivation (index >= 2^31)
/// - Không retry loop: mọi 32 bytes đều là private key hợp lệ
///
/// # Security
/// - HMAC-SHA512 cho mỗi level derivation
/// - Intermediate HMAC output tự động zeroize
/// - Không lưu intermediate state
pub struct Ed25519Deriver;

impl Ed25519Deriver {
    /// SLIP-0010 master key seed constant
    const MASTER_SECRET: &'static [u8] = b"ed25519 seed";

    /// Derive master key từ seed
    ///
    /// `I = HMAC-SHA512(Key = "ed25519 seed", Data = seed)`
    /// IL (32 bytes) = private key, IR (32 bytes) = chain code. Luôn hợp lệ.
    pub fn master_from_seed(
        seed: &[u8],
        private_key: &mut [u8; 32],
        chain_code: &mut [u8; 32],
    ) -> WalletResult<()> {
        let i = hmac_sha512(Self::MASTER_SECRET, &[seed])?;
        private_key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
        Ok(())
    }

    /// Derive child key tại `index`, in-place (hardened only)
    ///
    /// `Data = 0x00 || parent_key || ser32(index)`
    /// `I = HMAC-SHA512(Key = parent_chain_code, Data)`. Không retry.
    pub fn derive_child(
        private_key: &mut [u8; 32],
        chain_code: &mut [u8; 32],
        index: u32,
    ) -> WalletResult<()> {
        if !is_hardened(index) {
            return Err(WalletError::Crypto(CryptoError::HardenedIndexRequired(
                index,
            )));
        }

        let index_bytes = index.to_be_bytes();
        let i = hmac_sha512(&chain_code[..], &[&[0x00], &private_key[..], &index_bytes])?;
        private_key.copy_from_slice(&i[..32]);
        chain_code.copy_from_slice(&i[32..]);
        Ok(())
    }

    /// Ed25519 public key (32 bytes)
    pub fn public_key(private_key: &[u8; 32]) -> [u8; 32] {
        SigningKey::from_bytes(private_key)
            .verifying_key()
            .to_bytes()
    }

    /// EdDSA sign — 64 bytes
    pub fn sign(private_key: &[u8; 32], data: &[u8]) -> [u8; 64] {
        SigningKey::from_bytes(private_key).sign(data).to_bytes()
    }

    /// Verify a 64-byte signature against a 32-byte public key
    pub fn verify(public_key: &[u8], data: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::try_from(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::try_from(signature) else {
            return false;
        };
        verifying_key.verify(data, &signature).is_ok()
    }
}

// =============================================================================
// TESTS
// =============================================================================
