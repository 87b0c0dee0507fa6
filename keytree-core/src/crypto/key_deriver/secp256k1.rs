// keytree-core/src/crypto/key_deriver/secp256k1.rs
//
// secp256k1 Key Derivation — BIP-32 / SLIP-0010
//
// Dùng cho: Bitcoin, Ethereum/EVM, Cosmos, Tron, ...
// Algorithm: HMAC-SHA512 hierarchical deterministic derivation
// Reference: https://github.com/satoshilabs/slips/blob/master/slip-0010.md

use crate::crypto::key_deriver::hmac_sha512;
use crate::crypto::paths::is_hardened;
use crate::error::{CryptoError, WalletError, WalletResult};
use k256::{
    ecdsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey, VerifyingKey,
    },
    elliptic_curve::{sec1::ToEncodedPoint, PrimeField},
    FieldBytes, Scalar, SecretKey,
};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

/// secp256k1 Key Deriver — BIP-32 / SLIP-0010
///
/// # Security
/// - Private key và chain code được ghi in-place vào buffer caller cung cấp
/// - Intermediate HMAC output tự động zeroize
/// - Scalar parse là strict: `I_L >= n` là retry, KHÔNG reduce
///
/// # Performance
/// - Iterative derivation (không recursion)
/// - Retry loop là explicit loop, xác suất retry ~2^-127 mỗi bước
pub struct Secp256k1Deriver;

impl Secp256k1Deriver {
    /// BIP-32 / SLIP-0010 master key seed constant
    const MASTER_SECRET: &'static [u8] = b"Bitcoin seed";

    /// Derive master key từ seed
    ///
    /// `I = HMAC-SHA512(Key = "Bitcoin seed", Data = seed)`, retry với
    /// `I = HMAC-SHA512(Key, I)` khi `I_L == 0` hoặc `I_L >= n`.
    pub fn master_from_seed(
        seed: &[u8],
        private_key: &mut [u8; 32],
        chain_code: &mut [u8; 32],
    ) -> WalletResult<()> {
        let mut i = hmac_sha512(Self::MASTER_SECRET, &[seed])?;
        loop {
            let mut il = [0u8; 32];
            il.copy_from_slice(&i[..32]);
            let candidate = scalar_from_bytes(&il);
            il.zeroize();

            match candidate {
                Some(scalar) if !bool::from(scalar.is_zero()) => {
                    private_key.copy_from_slice(&i[..32]);
                    chain_code.copy_from_slice(&i[32..]);
                    return Ok(());
                }
                _ => i = hmac_sha512(Self::MASTER_SECRET, &[&i[..]])?,
            }
        }
    }

    /// Derive child key tại `index`, in-place
    ///
    /// Hardened: `Data = 0x00 || key || ser32(index)`
    /// Normal:   `Data = serP(pub) || ser32(index)` (33-byte compressed)
    ///
    /// `child = (I_L + parent) mod n`; nếu `I_L >= n` hoặc child == 0 thì
    /// retry với `Data = 0x01 || I_R || ser32(index)`.
    pub fn derive_child(
        private_key: &mut [u8; 32],
        chain_code: &mut [u8; 32],
        index: u32,
    ) -> WalletResult<()> {
        let parent = scalar_from_bytes(private_key)
            .ok_or(WalletError::Crypto(CryptoError::InvalidCurveInput))?;

        let mut data = Zeroizing::new([0u8; 37]);
        if is_hardened(index) {
            data[0] = 0x00;
            data[1..33].copy_from_slice(&private_key[..]);
        } else {
            let compressed = Self::public_key_compressed(private_key)?;
            data[..33].copy_from_slice(&compressed);
        }
        data[33..].copy_from_slice(&index.to_be_bytes());

        loop {
            let i = hmac_sha512(&chain_code[..], &[&data[..]])?;

            let mut il = [0u8; 32];
            il.copy_from_slice(&i[..32]);
            let candidate = scalar_from_bytes(&il);
            il.zeroize();

            if let Some(tweak) = candidate {
                let child = tweak + parent;
                if !bool::from(child.is_zero()) {
                    private_key.copy_from_slice(&child.to_repr());
                    chain_code.copy_from_slice(&i[32..]);
                    return Ok(());
                }
            }

            // Retry: Data = 0x01 || I_R || ser32(index); index bytes giữ nguyên
            data[0] = 0x01;
            data[1..33].copy_from_slice(&i[32..]);
        }
    }

    /// Compressed SEC1 public key (33 bytes, prefix 0x02/0x03)
    pub fn public_key_compressed(private_key: &[u8; 32]) -> WalletResult<[u8; 33]> {
        let secret = parse_secret_key(private_key)?;
        let point = secret.public_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }

    /// Uncompressed SEC1 public key (65 bytes, prefix 0x04)
    pub fn public_key_uncompressed(private_key: &[u8; 32]) -> WalletResult<[u8; 65]> {
        let secret = parse_secret_key(private_key)?;
        let point = secret.public_key().to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }

    /// ECDSA sign over SHA-256(data) — 64 bytes `r || s`, low-s canonical,
    /// RFC 6979 deterministic nonce
    pub fn sign(private_key: &[u8; 32], data: &[u8]) -> WalletResult<[u8; 64]> {
        let signing_key = parse_signing_key(private_key)?;
        let signature: Signature = signing_key.sign(data);
        let signature = signature.normalize_s().unwrap_or(signature);

        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }

    /// Recoverable ECDSA sign — 65 bytes `r || s || v`, v ∈ {0, 1}
    pub fn sign_recoverable(private_key: &[u8; 32], data: &[u8]) -> WalletResult<[u8; 65]> {
        let signing_key = parse_signing_key(private_key)?;
        let prehash = Sha256::digest(data);
        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(&prehash)
            .map_err(|e| WalletError::Crypto(CryptoError::SigningFailed(e.to_string())))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }

    /// Verify a 64-byte signature against a SEC1 public key (33 or 65 bytes)
    pub fn verify(public_key: &[u8], data: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        verifying_key.verify(data, &signature).is_ok()
    }
}

/// Strict scalar parse: `None` khi bytes >= n. Zero vẫn là `Some` — caller
/// quyết định (master reject zero, child tweak cho phép).
fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    Scalar::from_repr(FieldBytes::from(*bytes)).into()
}

fn parse_secret_key(private_key: &[u8; 32]) -> WalletResult<SecretKey> {
    SecretKey::from_slice(private_key).map_err(|e| {
        WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
            "Invalid secp256k1 private key: {}",
            e
        )))
    })
}

fn parse_signing_key(private_key: &[u8; 32]) -> WalletResult<SigningKey> {
    SigningKey::from_slice(private_key).map_err(|e| {
        WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
            "Invalid secp256k1 private key: {}",
            e
        )))
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::paths::HARDENED_OFFSET;

    // SLIP-0010 test vector 1, secp256k1
    const SEED_V1: &str = "000102030405060708090a0b0c0d0e0f";

    fn master(seed_hex: &str) -> ([u8; 32], [u8; 32]) {
        let seed = hex::decode(seed_hex).unwrap();
        let mut key = [0u8; 32];
        let mut chain = [0u8; 32];
        Secp256k1Deriver::master_from_seed(&seed, &mut key, &mut chain).unwrap();
        (key, chain)
    }

    #[test]
    fn test_slip0010_vector1_master() {
        let (key, chain) = master(SEED_V1);
        assert_eq!(
            hex::encode(key),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(chain),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn test_slip0010_vector1_m_0h() {
        let (mut key, mut chain) = master(SEED_V1);
        Secp256k1Deriver::derive_child(&mut key, &mut chain, HARDENED_OFFSET).unwrap();
        assert_eq!(
            hex::encode(key),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(chain),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );
    }

    #[test]
    fn test_slip0010_vector1_deep_chain() {
        // m/0'/1/2'/2/1000000000
        let (mut key, mut chain) = master(SEED_V1);
        for index in [
            HARDENED_OFFSET,
            1,
            2 | HARDENED_OFFSET,
            2,
            1_000_000_000,
        ] {
            Secp256k1Deriver::derive_child(&mut key, &mut chain, index).unwrap();
        }
        assert_eq!(
            hex::encode(key),
            "471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8"
        );
        assert_eq!(
            hex::encode(chain),
            "c783e67b921d2beb8f6b389cc646d7263b4145701dadd2161548a8b078e65e9e"
        );
    }

    #[test]
    fn test_slip0010_vector2_normal_child() {
        // 64-byte seed, normal (non-hardened) derivation m/0
        let seed_v2 = "fffcf9f6f3f0edeae7e4e1dedbd8d5d2cfccc9c6c3c0bdbab7b4b1aeaba8a5a29f9c999693908d8a8784817e7b7875726f6c696663605d5a5754514e4b484542";
        let (mut key, mut chain) = master(seed_v2);
        assert_eq!(
            hex::encode(key),
            "4b03d6fc340455b363f51020ad3ecca4f0850280cf436c70c727923f6db46c3e"
        );
        Secp256k1Deriver::derive_child(&mut key, &mut chain, 0).unwrap();
        assert_eq!(
            hex::encode(key),
            "abe74a98f6c7eabee0428f53798f0ab8aa1bd37873999041703c742f15ac7e1e"
        );
    }

    #[test]
    fn test_public_key_encodings() {
        let (key, _) = master(SEED_V1);
        let compressed = Secp256k1Deriver::public_key_compressed(&key).unwrap();
        assert_eq!(
            hex::encode(compressed),
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2"
        );

        let uncompressed = Secp256k1Deriver::public_key_uncompressed(&key).unwrap();
        assert_eq!(uncompressed[0], 0x04);
        // X coordinate phải trùng giữa 2 encoding
        assert_eq!(&uncompressed[1..33], &compressed[1..]);
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let (key, _) = master(SEED_V1);
        let msg = b"keytree signing test";

        let signature = Secp256k1Deriver::sign(&key, msg).unwrap();
        let compressed = Secp256k1Deriver::public_key_compressed(&key).unwrap();
        let uncompressed = Secp256k1Deriver::public_key_uncompressed(&key).unwrap();

        assert!(Secp256k1Deriver::verify(&compressed, msg, &signature));
        assert!(Secp256k1Deriver::verify(&uncompressed, msg, &signature));
        assert!(!Secp256k1Deriver::verify(&compressed, b"other message", &signature));
    }

    #[test]
    fn test_sign_deterministic() {
        let (key, _) = master(SEED_V1);
        let s1 = Secp256k1Deriver::sign(&key, b"rfc6979").unwrap();
        let s2 = Secp256k1Deriver::sign(&key, b"rfc6979").unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_sign_recoverable() {
        let (key, _) = master(SEED_V1);
        let msg = b"recoverable";

        let signature = Secp256k1Deriver::sign_recoverable(&key, msg).unwrap();
        assert!(signature[64] == 0 || signature[64] == 1);

        // r || s phải trùng với non-recoverable form
        let plain = Secp256k1Deriver::sign(&key, msg).unwrap();
        assert_eq!(&signature[..64], &plain[..]);
    }

    #[test]
    fn test_derive_child_rejects_invalid_parent() {
        // Parent key = 0 không phải scalar hợp lệ
        let mut key = [0u8; 32];
        let mut chain = [1u8; 32];
        assert!(Secp256k1Deriver::derive_child(&mut key, &mut chain, 0).is_err());
    }

    #[test]
    fn test_derived_keys_are_valid_scalars() {
        // 1 <= k < n cho mọi key trên một chain dài
        let (mut key, mut chain) = master(SEED_V1);
        for index in 0..16u32 {
            Secp256k1Deriver::derive_child(&mut key, &mut chain, index).unwrap();
            assert!(scalar_from_bytes(&key).is_some());
            assert_ne!(key, [0u8; 32]);
        }
    }
}
