//! Lightning (BOLT3) commitment transaction engine.
//!
//! This crate builds the per-state Bitcoin transactions that both parties of
//! a payment channel must construct byte-identically in order to exchange
//! valid signatures:
//!
//! - per-commitment key and secret derivation ([`keys::derivation`])
//! - compact storage of revealed revocation secrets ([`keys::shachain`])
//! - BOLT3 witness scripts for channel outputs ([`scripts`])
//! - commitment transaction construction, including HTLC dust trimming,
//!   weight-based fees, anchor outputs and deterministic output ordering
//!   ([`transactions::commitment`])
//! - second-stage HTLC-success/HTLC-timeout transactions
//!   ([`transactions::htlc`])
//!
//! Wire messaging, the channel state machine, persistence and fee estimation
//! are external collaborators; the fee rate is consumed as an opaque
//! `sat/kw` input and node configuration arrives as an explicit
//! [`ChannelConfig`], never as global state.

pub mod config;
pub mod error;
pub mod keys;
pub mod scripts;
pub mod signing;
pub mod transactions;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::{ChannelConfig, FeePolicy};
pub use error::{KeyError, ShachainError, TxBuildError};
pub use keys::commitment::CommitmentKeys;
pub use keys::derivation::{
    derive_per_commitment_point, derive_private_key, derive_public_key,
    derive_revocation_private_key, derive_revocation_public_key, generate_per_commitment_secret,
};
pub use keys::shachain::SecretStore;
pub use transactions::commitment::{
    get_commitment_transaction_number_obscure_factor, CommitmentTransaction,
    CommitmentTransactionBuilder,
};
pub use transactions::funding::FundingOutput;
pub use types::{HtlcDirection, HtlcOutput};

/// Commitment numbers count upward from zero; the per-commitment secret
/// index counts down from this value (`2^48 - 1`).
pub const INITIAL_COMMITMENT_NUMBER: u64 = (1 << 48) - 1;
