//! Wallet error types.

use arx_core::ProviderError;
use thiserror::Error;

/// Errors from mnemonic/entropy/seed conversions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    /// Entropy must be 16, 24, or 32 bytes.
    #[error("wrong entropy length {0}, only 16/24/32 bytes accepted")]
    EntropyLength(usize),

    /// Mnemonics must be 12, 18, or 24 words.
    #[error("wrong word count {0}, only 12/18/24 words accepted")]
    WordCount(usize),

    /// A word index outside the 2048-entry list.
    #[error("word index {0} out of range")]
    WordIndex(u16),

    /// A word not present in the English list.
    #[error("unknown word: {0:?}")]
    UnknownWord(String),

    /// The trailing checksum bits do not match the entropy.
    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,

    /// Entropy source or hash backend failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors from BIP32 derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    /// Path-string derivation is not supported; pass child indices.
    #[error("derivation from a path string is not implemented")]
    NotImplemented,

    /// Curve or hash backend failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors from address encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Witness programs and checksummed hashes must be 20 or 32 bytes.
    #[error("hash length {0} not supported, expected 20 or 32")]
    HashLength(usize),

    /// The human-readable prefix is not valid for Bech32.
    #[error("invalid human-readable prefix: {0:?}")]
    InvalidHrp(String),

    /// Bech32 encoding failed.
    #[error("bech32 encoding failed: {0}")]
    Bech32(String),
}
