// keytree-core/src/crypto/key_deriver/nistp256.rs
//
// NIST P-256 Key Derivation — SLIP-0010
//
// Cùng algorithm với secp256k1, khác curve order và master seed constant.
// Reference: https://github.com/satoshilabs/slips/blob/master/slip-0010.md

use crate::crypto::key_deriver::hmac_sha512;
use crate::crypto::paths::is_hardened;
use crate::error::{CryptoError, WalletError, WalletResult};
use p256::{
    ecdsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey, VerifyingKey,
    },
    elliptic_curve::{sec1::ToEncodedPoint, Field, PrimeField},
    FieldBytes, Scalar, SecretKey,
};
use zeroize::{Zeroize, Zeroizing};

/// NIST P-256 Key Deriver — SLIP-0010
///
/// # Khác biệt với secp256k1
/// - Master key seed: "Nist256p1 seed"
/// - Không có recoverable signature form
pub struct NistP256Deriver;

impl NistP256Deriver {
    /// SLIP-0010 master key seed constant
    const MASTER_SECRET: &'static [u8] = b"Nist256p1 seed";

    /// Derive master key từ seed, retry khi `I_L == 0` hoặc `I_L >= n`
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

    /// Derive child key tại `index`, in-place. Retry với
    /// `Data = 0x01 || I_R || ser32(index)` khi I_L/child không hợp lệ.
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

    /// ECDSA sign over SHA-256(data) — 64 bytes `r || s`, RFC 6979
    pub fn sign(private_key: &[u8; 32], data: &[u8]) -> WalletResult<[u8; 64]> {
        let signing_key = parse_signing_key(private_key)?;
        let signature: Signature = signing_key.sign(data);
        let signature = signature.normalize_s().unwrap_or(signature);

        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
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

/// Strict scalar parse: `None` khi bytes >= n.
fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    Scalar::from_repr(FieldBytes::from(*bytes)).into()
}

fn parse_secret_key(private_key: &[u8; 32]) -> WalletResult<SecretKey> {
    SecretKey::from_slice(private_key).map_err(|e| {
        WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
            "Invalid P-256 private key: {}",
            e
        )))
    })
}

fn parse_signing_key(private_key: &[u8; 32]) -> WalletResult<SigningKey> {
    SigningKey::from_slice(private_key).map_err(|e| {
        WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
            "Invalid P-256 private key: {}",
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

    // SLIP-0010 test vector 1, nist256p1
    const SEED_V1: &str = "000102030405060708090a0b0c0d0e0f";

    fn master(seed_hex: &str) -> ([u8; 32], [u8; 32]) {
        let seed = hex::decode(seed_hex).unwrap();
        let mut key = [0u8; 32];
        let mut chain = [0u8; 32];
        NistP256Deriver::master_from_seed(&seed, &mut key, &mut chain).unwrap();
        (key, chain)
    }

    #[test]
    fn test_slip0010_vector1_master() {
        let (key, chain) = master(SEED_V1);
        assert_eq!(
            hex::encode(key),
            "612091aaa12e22dd2abef664f8a01a82cae99ad7441b7ef8110424915c268bc2"
        );
        assert_eq!(
            hex::encode(chain),
            "beeb672fe4621673f722f38529c07392fecaa61015c80c34f29ce8b41b3cb6ea"
        );
    }

    #[test]
    fn test_slip0010_vector1_m_0h() {
        let (mut key, mut chain) = master(SEED_V1);
        NistP256Deriver::derive_child(&mut key, &mut chain, HARDENED_OFFSET).unwrap();
        assert_eq!(
            hex::encode(key),
            "6939694369114c67917a182c59ddb8cafc3004e63ca5d3b84403ba8613debc0c"
        );
        assert_eq!(
            hex::encode(chain),
            "84e9c258bb8557a40e0d041115b376dd55eda99c0042ce29e81ebe4efed9b86a"
        );
    }

    #[test]
    fn test_public_key_encodings() {
        let (key, _) = master(SEED_V1);
        let compressed = NistP256Deriver::public_key_compressed(&key).unwrap();
        assert_eq!(
            hex::encode(compressed),
            "0266874dc6ade47b3ecd096745ca09bcd29638dd52c2c12117b11ed3e458cfa9e8"
        );

        let uncompressed = NistP256Deriver::public_key_uncompressed(&key).unwrap();
        assert_eq!(uncompressed[0], 0x04);
        assert_eq!(&uncompressed[1..33], &compressed[1..]);
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let (key, _) = master(SEED_V1);
        let msg = b"p256 signing test";

        let signature = NistP256Deriver::sign(&key, msg).unwrap();
        let compressed = NistP256Deriver::public_key_compressed(&key).unwrap();

        assert!(NistP256Deriver::verify(&compressed, msg, &signature));
        assert!(!NistP256Deriver::verify(&compressed, b"tampered", &signature));
    }

    #[test]
    fn test_sign_deterministic() {
        let (key, _) = master(SEED_V1);
        let s1 = NistP256Deriver::sign(&key, b"rfc6979").unwrap();
        let s2 = NistP256Deriver::sign(&key, b"rfc6979").unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_normal_and_hardened_children_differ() {
        let (key, chain) = master(SEED_V1);

        let (mut k1, mut c1) = (key, chain);
        NistP256Deriver::derive_child(&mut k1, &mut c1, 5).unwrap();

        let (mut k2, mut c2) = (key, chain);
        NistP256Deriver::derive_child(&mut k2, &mut c2, 5 | HARDENED_OFFSET).unwrap();

        assert_ne!(k1, k2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_derived_keys_are_valid_scalars() {
        let (mut key, mut chain) = master(SEED_V1);
        for index in 0..16u32 {
            NistP256Deriver::derive_child(&mut key, &mut chain, index).unwrap();
            assert!(scalar_from_bytes(&key).is_some());
            assert_ne!(key, [0u8; 32]);
        }
    }
}
