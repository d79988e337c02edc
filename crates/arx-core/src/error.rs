//! Error types for providers and the RLP codec.

use thiserror::Error;

/// Failures reported by a hash/curve/entropy backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Private key bytes rejected by the curve implementation.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Public key bytes rejected by the curve implementation.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Signing failed inside the curve implementation.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The system entropy source failed.
    #[error("entropy source failure")]
    Entropy,
}

/// Failures in RLP encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RlpError {
    /// Output buffer cannot hold the encoding.
    #[error("output buffer too small: need {need}, have {have}")]
    OutputTooSmall { need: usize, have: usize },

    /// Payload length exceeds what a 4-byte length field can carry.
    #[error("payload too long for RLP length encoding")]
    TooLong,

    /// First byte of a list buffer is not a list header.
    #[error("not an RLP list header: {0:#04x}")]
    ListHeader(u8),

    /// Declared payload length disagrees with the buffer length.
    #[error("declared payload length {payload} does not fit buffer of {buflen} bytes")]
    PayloadLength { payload: usize, buflen: usize },

    /// An item ran past the end of the payload.
    #[error("item #{index} truncated")]
    Truncated { index: usize },

    /// An item declared a length-of-length over 4 bytes.
    #[error("item #{index}: length-of-length exceeds 4 bytes")]
    LengthOfLength { index: usize },

    /// An item header byte the decoder does not accept.
    #[error("item #{index}: unsupported header byte {byte:#04x}")]
    ItemHeader { index: usize, byte: u8 },

    /// Declared item count did not consume the payload exactly.
    #[error("{remaining} payload bytes left after {count} items")]
    TrailingBytes { count: usize, remaining: usize },

    /// Item count was nonzero for an empty payload.
    #[error("empty payload cannot hold {0} items")]
    EmptyPayload(usize),

    /// A decode handler rejected an item.
    #[error("handler rejected item #{index}: {reason}")]
    Handler { index: usize, reason: String },
}
