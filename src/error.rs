use thiserror::Error;

/// Failures of the per-commitment key derivation functions.
///
/// These are fatal protocol or programming errors for the calling channel;
/// none of them are retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A derived scalar was zero or a point operation produced the point at
    /// infinity. Practically unreachable for hash-derived tweaks.
    #[error("derived key material is not a valid secp256k1 scalar or point")]
    InvalidKey,
    /// The per-commitment index lies outside `[0, 2^48)`.
    #[error("per-commitment index {0} is outside [0, 2^48)")]
    IndexOutOfRange(u64),
}

/// Failures of the shachain secret store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShachainError {
    /// The requested index is not derivable from any stored secret, i.e. the
    /// counterparty has not yet revealed enough of the chain.
    #[error("secret at index {0} cannot be derived from any stored secret")]
    Underivable(u64),
}

/// Failures of commitment transaction construction and signing.
///
/// Dust trimming and fee clamping are deterministic policy and are never
/// reported through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxBuildError {
    #[error(transparent)]
    Key(#[from] KeyError),
    /// The counterparty signature did not verify against the funding input.
    #[error("counterparty signature is invalid for the funding input")]
    InvalidSignature,
    /// Sighash computation failed; only possible for a malformed input index.
    #[error("sighash computation failed: {0}")]
    Sighash(String),
    /// The caller enabled a fee-sanity policy and the feerate fell outside it.
    #[error("feerate {feerate_per_kw} sat/kw outside policy bounds [{min}, {max}]")]
    FeePolicyViolation {
        feerate_per_kw: u64,
        min: u64,
        max: u64,
    },
}
