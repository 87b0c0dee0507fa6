use thiserror::Error;

pub type WalletResult<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Mnemonic Error: {0}")]
    Mnemonic(#[from] MnemonicError),

    #[error("Path Error: {0}")]
    Path(#[from] PathError),

    #[error("Cryptography Error: {0}")]
    Crypto(#[from] CryptoError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid word count: {0}. Expected 12, 15, 18, 21 or 24 words.")]
    InvalidWordCount(usize),

    // Chỉ báo vị trí, không bao giờ in ra word (mnemonic là secret material)
    #[error("Word at position {0} not found in the BIP39 wordlist.")]
    UnknownWord(usize),

    #[error("Checksum validation failed.")]
    ChecksumFailed,

    #[error("BIP39 internal error: {0}")]
    Bip39Error(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Derivation path must start with 'm': '{0}'")]
    InvalidPrefix(String),

    #[error("Invalid path segment: '{0}'")]
    InvalidSegment(String),

    #[error("Path index {0} must be below the hardening offset (2^31)")]
    IndexOutOfRange(u32),

    #[error("Derivation path must contain at least one index")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Ed25519 only supports hardened derivation (index {0} is not hardened)")]
    HardenedIndexRequired(u32),

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("Derived value is not a valid scalar for the curve")]
    InvalidCurveInput,
}
