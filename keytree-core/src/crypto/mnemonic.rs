// keytree-core/src/crypto/mnemonic.rs
//
// Mnemonic Module - BIP-39 Validation & Seed Derivation
// Chuẩn: BIP-39 (Mnemonic), PBKDF2-HMAC-SHA512 (Seed Derivation)
//
// Engine này KHÔNG sinh mnemonic — không có RNG ở bất kỳ đâu trong crate.
// Mnemonic luôn do caller cung cấp.

use crate::error::{MnemonicError, WalletError, WalletResult};
use bip39::Mnemonic;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Wallet Mnemonic - BIP-39 phrase đã validate
///
/// # Security Architecture
/// - **ZeroizeOnDrop**: Phrase được tự động ghi đè bằng 0 khi struct bị drop
/// - **No Debug Leak**: Custom Debug impl không hiển thị phrase
/// - **No RNG**: Chỉ khôi phục từ phrase có sẵn, không bao giờ tự sinh
///
/// # Validation
/// - Word count ∈ {12, 15, 18, 21, 24}
/// - Từng word phải có trong BIP-39 English wordlist (2048 từ)
/// - Checksum: CS bits đầu của SHA-256(entropy)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletMnemonic {
    phrase: String,
    word_count: usize,
}

// Custom Debug - KHÔNG BAO GIỜ hiển thị mnemonic phrase
impl std::fmt::Debug for WalletMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletMnemonic")
            .field("word_count", &self.word_count)
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl WalletMnemonic {
    /// Khôi phục mnemonic từ phrase có sẵn
    ///
    /// Whitespace được normalize về single-space trước khi validate.
    ///
    /// # Errors
    /// - [`MnemonicError::InvalidWordCount`] — số words không thuộc {12, 15, 18, 21, 24}
    /// - [`MnemonicError::UnknownWord`] — word không có trong wordlist (báo vị trí)
    /// - [`MnemonicError::ChecksumFailed`] — checksum không khớp
    pub fn from_phrase(phrase: &str) -> WalletResult<Self> {
        // Normalize whitespace và count words
        let words = phrase.split_whitespace().collect::<Vec<_>>();
        let count = words.len();

        if !matches!(count, 12 | 15 | 18 | 21 | 24) {
            return Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount(
                count,
            )));
        }

        // Parse và validate với BIP-39 (wordlist + checksum)
        let normalized = words.join(" ");
        Mnemonic::parse(&normalized).map_err(|e| {
            WalletError::Mnemonic(match e {
                bip39::Error::BadWordCount(n) => MnemonicError::InvalidWordCount(n),
                bip39::Error::UnknownWord(position) => MnemonicError::UnknownWord(position),
                bip39::Error::InvalidChecksum => MnemonicError::ChecksumFailed,
                other => MnemonicError::Bip39Error(other.to_string()),
            })
        })?;

        Ok(Self {
            phrase: normalized,
            word_count: count,
        })
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    /// Lấy mnemonic phrase
    ///
    /// # Warning
    /// Cẩn thận khi hiển thị hoặc log giá trị này!
    #[inline]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Lấy số lượng words
    #[inline]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Lấy danh sách các words
    pub fn words(&self) -> Vec<&str> {
        self.phrase.split_whitespace().collect()
    }

    /// Lấy strength (bit) của mnemonic
    pub fn strength_bits(&self) -> usize {
        match self.word_count {
            12 => 128,
            15 => 160,
            18 => 192,
            21 => 224,
            24 => 256,
            _ => 0,
        }
    }

    // =========================================================================
    // SEED DERIVATION
    // =========================================================================

    /// Tạo seed từ mnemonic (PBKDF2-HMAC-SHA512)
    ///
    /// Salt = `"mnemonic" || passphrase`, 2048 iterations, dkLen = 64.
    /// Mnemonic và passphrase đều được NFKD-normalize (identity cho English
    /// wordlist và ASCII passphrase).
    ///
    /// # Arguments
    /// * `passphrase` - Optional BIP-39 passphrase (thêm layer bảo mật)
    ///
    /// # Returns
    /// 64-byte seed wrapped trong `Zeroizing` để tự động xóa khi drop
    ///
    /// # Security Note
    /// Passphrase khác với password. Nếu mất passphrase, không thể khôi phục
    /// ví ngay cả khi có mnemonic phrase.
    pub fn to_seed(&self, passphrase: Option<&str>) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.to_seed_bytes(passphrase).to_vec())
    }

    /// Tạo seed với fixed-size array (hiệu quả hơn Vec)
    pub fn to_seed_bytes(&self, passphrase: Option<&str>) -> Zeroizing<[u8; 64]> {
        let password = passphrase.unwrap_or("");
        let mnemonic = Mnemonic::parse(&self.phrase).expect("Internal phrase is valid");
        Zeroizing::new(mnemonic.to_seed(password))
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Kiểm tra xem phrase có hợp lệ không (try form, không raise)
    ///
    /// Thực hiện đầy đủ validation: word count, wordlist, checksum
    #[inline]
    pub fn validate(phrase: &str) -> bool {
        let count = phrase.split_whitespace().count();
        if !matches!(count, 12 | 15 | 18 | 21 | 24) {
            return false;
        }
        Mnemonic::parse(phrase).is_ok()
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Standard test mnemonic (from BIP-39 test vectors)
    const TEST_MNEMONIC_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const TEST_MNEMONIC_24: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn test_from_phrase_valid() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        assert_eq!(mnemonic.strength_bits(), 128);
    }

    #[test]
    fn test_from_phrase_24_words() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_24).unwrap();
        assert_eq!(mnemonic.word_count(), 24);
        assert_eq!(mnemonic.strength_bits(), 256);
    }

    #[test]
    fn test_from_phrase_normalizes_whitespace() {
        let messy_phrase =
            "  abandon  abandon   abandon abandon abandon abandon abandon abandon abandon abandon abandon about  ";
        let mnemonic = WalletMnemonic::from_phrase(messy_phrase).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        assert_eq!(mnemonic.phrase(), TEST_MNEMONIC_12);
    }

    #[test]
    fn test_from_phrase_invalid_word_count() {
        // 13 words — không thuộc các count hợp lệ
        let thirteen = format!("{} abandon", TEST_MNEMONIC_12);
        let result = WalletMnemonic::from_phrase(&thirteen);
        assert!(matches!(
            result,
            Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount(13)))
        ));

        let result = WalletMnemonic::from_phrase("abandon abandon abandon");
        assert!(matches!(
            result,
            Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount(3)))
        ));
    }

    #[test]
    fn test_from_phrase_whitespace_only() {
        let result = WalletMnemonic::from_phrase("   \t  \n ");
        assert!(matches!(
            result,
            Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount(0)))
        ));
    }

    #[test]
    fn test_from_phrase_unknown_word() {
        let invalid = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon notaword";
        let result = WalletMnemonic::from_phrase(invalid);
        assert!(matches!(
            result,
            Err(WalletError::Mnemonic(MnemonicError::UnknownWord(_)))
        ));
    }

    #[test]
    fn test_from_phrase_bad_checksum() {
        // 12 từ hợp lệ trong wordlist nhưng checksum sai
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        let result = WalletMnemonic::from_phrase(bad);
        assert!(matches!(
            result,
            Err(WalletError::Mnemonic(MnemonicError::ChecksumFailed))
        ));
    }

    #[test]
    fn test_to_seed_trezor_vector() {
        // BIP-39 test vector: passphrase "TREZOR"
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let seed = mnemonic.to_seed_bytes(Some("TREZOR"));
        assert_eq!(
            hex::encode(&seed[..]),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_to_seed_no_passphrase_vector() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let seed = mnemonic.to_seed(None);
        assert_eq!(seed.len(), 64);
        assert_eq!(hex::encode(&seed[0..8]), "5eb00bbddcf069b3");
    }

    #[test]
    fn test_empty_passphrase_equals_none() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        assert_eq!(
            &mnemonic.to_seed_bytes(None)[..],
            &mnemonic.to_seed_bytes(Some(""))[..]
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let seed_no_pass = mnemonic.to_seed(None);
        let seed_with_pass = mnemonic.to_seed(Some("TREZOR"));
        assert_ne!(&*seed_no_pass, &*seed_with_pass);
    }

    #[test]
    fn test_to_seed_deterministic() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let s1 = mnemonic.to_seed_bytes(Some("x"));
        let s2 = mnemonic.to_seed_bytes(Some("x"));
        assert_eq!(&s1[..], &s2[..]);
    }

    #[test]
    fn test_altering_word_changes_seed() {
        let a = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        // "about" → "able" vẫn là mnemonic 12 từ hợp lệ (checksum khác entropy)
        let b = WalletMnemonic::from_phrase(
            "legal winner thank year wave sausage worth useful legal winner thank yellow",
        )
        .unwrap();
        assert_ne!(&a.to_seed_bytes(None)[..], &b.to_seed_bytes(None)[..]);
    }

    #[test]
    fn test_validate() {
        assert!(WalletMnemonic::validate(TEST_MNEMONIC_12));
        assert!(WalletMnemonic::validate(TEST_MNEMONIC_24));
        assert!(!WalletMnemonic::validate("invalid mnemonic phrase"));
        assert!(!WalletMnemonic::validate("abandon")); // Too few words
        assert!(!WalletMnemonic::validate(""));
    }

    #[test]
    fn test_words() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let words = mnemonic.words();
        assert_eq!(words.len(), 12);
        assert_eq!(words[0], "abandon");
        assert_eq!(words[11], "about");
    }

    #[test]
    fn test_debug_does_not_leak_phrase() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let debug_output = format!("{:?}", mnemonic);

        assert!(!debug_output.contains("abandon"));
        assert!(debug_output.contains("REDACTED"));
        assert!(debug_output.contains("word_count: 12"));
    }
}
