// keytree-core/src/crypto/paths.rs
//
// Derivation Path Codec + Multi-Chain Path Builders
// BIP-44 (Purpose), SLIP-44 (Coin Types), SLIP-0010 (ed25519 all-hardened)

use crate::error::{PathError, WalletError, WalletResult};
use std::fmt;
use std::str::FromStr;

/// Hardening offset. Index >= 2^31 là hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Mark an index as hardened.
#[inline]
pub const fn hardened(index: u32) -> u32 {
    index | HARDENED_OFFSET
}

/// Check whether an index carries the hardening offset.
#[inline]
pub const fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

// =============================================================================
// DERIVATION PATH
// =============================================================================
/// Parsed BIP-44 derivation path — ordered list of 32-bit child indices.
///
/// Textual grammar: `m ( '/' segment )*` với `segment = digits ['\'' | 'h']`.
/// Cả `'` và `h` đều đánh dấu hardened; canonical form dùng `'`.
///
/// `"m"` một mình parse thành path rỗng (master-only). Segment rỗng
/// (`"m/"`, `"m//0"`) bị reject, và giá trị raw của segment phải < 2^31
/// trước khi cộng hardening offset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Build a path from raw indices (already carrying the hardening offset
    /// where intended).
    pub fn new(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    /// The child indices, in derivation order.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a path string. Raising form — see [`try_parse_into`](Self::try_parse_into)
    /// for the boolean variant.
    pub fn parse(text: &str) -> WalletResult<Self> {
        let rest = match split_prefix(text) {
            Ok(rest) => rest,
            Err(()) => {
                return Err(WalletError::Path(PathError::InvalidPrefix(
                    text.to_string(),
                )))
            }
        };

        let Some(rest) = rest else {
            // "m" — master only, zero indices
            return Ok(Self(Vec::new()));
        };

        let mut indices = Vec::new();
        for segment in rest.split('/') {
            match segment_value(segment) {
                Some(index) => indices.push(index),
                None => return Err(WalletError::Path(classify_segment(segment))),
            }
        }
        Ok(Self(indices))
    }

    /// Parse into a caller-provided buffer without allocating.
    ///
    /// Trả về `false` (và ghi `0` vào `indices_written`) khi input không hợp
    /// lệ hoặc `out` quá ngắn. `indices_written` là SỐ LƯỢNG index đã ghi,
    /// không phải số bytes.
    pub fn try_parse_into(text: &str, out: &mut [u32], indices_written: &mut usize) -> bool {
        *indices_written = 0;

        let rest = match split_prefix(text) {
            Ok(rest) => rest,
            Err(()) => return false,
        };
        let Some(rest) = rest else {
            // "m" — hợp lệ, zero indices
            return true;
        };

        let mut count = 0usize;
        for segment in rest.split('/') {
            let Some(index) = segment_value(segment) else {
                return false;
            };
            if count >= out.len() {
                return false;
            }
            out[count] = index;
            count += 1;
        }

        *indices_written = count;
        true
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(indices: Vec<u32>) -> Self {
        Self(indices)
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    /// Canonical textual form: `m` rồi `/n` (normal) hoặc `/n'` (hardened).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for &index in &self.0 {
            if is_hardened(index) {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// -----------------------------------------------------------------------------
// Single-pass parser internals. Shared giữa raising form và try form;
// không copy substring, không allocate trên happy path.
// -----------------------------------------------------------------------------

/// Validate the `m` / `m/` header. `Ok(None)` nghĩa là input chính xác `"m"`.
pub(crate) fn split_prefix(text: &str) -> Result<Option<&str>, ()> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes[0] != b'm' {
        return Err(());
    }
    if bytes.len() == 1 {
        return Ok(None);
    }
    if bytes[1] != b'/' {
        return Err(());
    }
    Ok(Some(&text[2..]))
}

fn split_hardener(segment: &str) -> (&str, bool) {
    match segment.as_bytes().last() {
        Some(b'\'') | Some(b'h') => (&segment[..segment.len() - 1], true),
        _ => (segment, false),
    }
}

/// Decode one segment. `None` cho mọi dạng lỗi: rỗng, non-digit, overflow,
/// hoặc giá trị raw >= 2^31.
pub(crate) fn segment_value(segment: &str) -> Option<u32> {
    let (digits, is_hard) = split_hardener(segment);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = digits.parse().ok()?;
    if value >= HARDENED_OFFSET {
        return None;
    }
    Some(if is_hard { value | HARDENED_OFFSET } else { value })
}

/// Map a rejected segment to the right error for the raising form.
fn classify_segment(segment: &str) -> PathError {
    let (digits, _) = split_hardener(segment);
    match digits.parse::<u32>() {
        Ok(value) if value >= HARDENED_OFFSET => PathError::IndexOutOfRange(value),
        _ => PathError::InvalidSegment(segment.to_string()),
    }
}

// =============================================================================
// CANONICAL PATH BUILDERS
// =============================================================================
/// Pre-built derivation paths cho các chain family chính.
///
/// # Conventions
/// - BIP-44: `m/44'/coin'/account'/change/index` (secp256k1)
/// - SLIP-0010: all-hardened variants (ed25519)
pub struct DerivationPaths;

impl DerivationPaths {
    // =========================================================================
    // EVM CHAINS (secp256k1) — BIP-44, coin_type = 60
    // =========================================================================
    pub const EVM_0: &'static str = "m/44'/60'/0'/0/0";

    /// EVM path with custom address index
    #[inline]
    pub fn evm(index: u32) -> String {
        format!("m/44'/60'/0'/0/{}", index)
    }

    /// EVM path with custom account & index (multi-account)
    #[inline]
    pub fn evm_account(account: u32, index: u32) -> String {
        format!("m/44'/60'/{}'/0/{}", account, index)
    }

    // =========================================================================
    // COSMOS SDK (secp256k1) — BIP-44, coin_type = 118
    // =========================================================================
    pub const COSMOS_0: &'static str = "m/44'/118'/0'/0/0";

    #[inline]
    pub fn cosmos(index: u32) -> String {
        format!("m/44'/118'/0'/0/{}", index)
    }

    // =========================================================================
    // SOLANA (ed25519) — SLIP-0010 (all levels hardened)
    // =========================================================================
    pub const SOLANA_0: &'static str = "m/44'/501'/0'/0'";

    /// Solana path with custom account index
    #[inline]
    pub fn solana(account: u32) -> String {
        format!("m/44'/501'/{}'/0'", account)
    }

    // =========================================================================
    // CUSTOM PATH BUILDERS
    // =========================================================================
    /// Tạo BIP-44 path tùy chỉnh (cho secp256k1 / P-256 chains)
    #[inline]
    pub fn bip44(purpose: u32, coin_type: u32, account: u32, change: u32, index: u32) -> String {
        format!(
            "m/{}'/{}'/{}'/{}/{}",
            purpose, coin_type, account, change, index
        )
    }

    /// Tạo SLIP-0010 path tùy chỉnh (cho ed25519 chains, all hardened)
    #[inline]
    pub fn slip0010(coin_type: u32, account: u32) -> String {
        format!("m/44'/{}'/{}'/0'", coin_type, account)
    }
}

// =============================================================================
// TESTS
// =============================================================================
