use bitcoin::secp256k1::{All, PublicKey, Secp256k1};

use crate::error::KeyError;
use crate::keys::derivation::{derive_public_key, derive_revocation_public_key};

/// The set of public keys used in the construction of one commitment
/// transaction, all derived from the channel basepoints and the
/// per-commitment point of that state.
///
/// "Local" here always means the party whose commitment transaction is being
/// built (the potential broadcaster), "remote" the counterparty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentKeys {
    /// The per-commitment point the other keys were derived from.
    pub per_commitment_point: PublicKey,
    /// Lets the counterparty punish the broadcaster if an old state is
    /// broadcast.
    pub revocation_key: PublicKey,
    pub local_htlc_key: PublicKey,
    pub remote_htlc_key: PublicKey,
    /// Claims the `to_local` output after the contest delay.
    pub local_delayed_payment_key: PublicKey,
}

impl CommitmentKeys {
    /// Derives the full key set from channel basepoints.
    ///
    /// The revocation basepoint is the *remote* party's: only they may sweep
    /// a revoked local commitment.
    pub fn from_basepoints(
        per_commitment_point: &PublicKey,
        local_delayed_payment_basepoint: &PublicKey,
        local_htlc_basepoint: &PublicKey,
        remote_revocation_basepoint: &PublicKey,
        remote_htlc_basepoint: &PublicKey,
        secp_ctx: &Secp256k1<All>,
    ) -> Result<Self, KeyError> {
        Ok(Self {
            per_commitment_point: *per_commitment_point,
            revocation_key: derive_revocation_public_key(
                remote_revocation_basepoint,
                per_commitment_point,
                secp_ctx,
            )?,
            local_htlc_key: derive_public_key(local_htlc_basepoint, per_commitment_point, secp_ctx)?,
            remote_htlc_key: derive_public_key(
                remote_htlc_basepoint,
                per_commitment_point,
                secp_ctx,
            )?,
            local_delayed_payment_key: derive_public_key(
                local_delayed_payment_basepoint,
                per_commitment_point,
                secp_ctx,
            )?,
        })
    }

    /// Builds the key set from already-derived keys, bypassing derivation.
    /// Used when exact keys are supplied externally (e.g. protocol test
    /// vectors).
    pub fn from_keys(
        per_commitment_point: PublicKey,
        revocation_key: PublicKey,
        local_delayed_payment_key: PublicKey,
        local_htlc_key: PublicKey,
        remote_htlc_key: PublicKey,
    ) -> Self {
        Self {
            per_commitment_point,
            revocation_key,
            local_htlc_key,
            remote_htlc_key,
            local_delayed_payment_key,
        }
    }
}
