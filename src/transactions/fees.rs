//! Weight and fee arithmetic for commitment and second-stage transactions.
//!
//! Weights are the fixed BOLT3 figures; the feerate arrives as an opaque
//! sat-per-1000-weight value from an external estimator.

use crate::types::{HtlcDirection, HtlcOutput};

/// Weight of a commitment transaction with no HTLC outputs.
pub const COMMITMENT_TX_BASE_WEIGHT: u64 = 724;
/// Additional commitment weight per included HTLC output.
pub const COMMITMENT_TX_WEIGHT_PER_HTLC: u64 = 172;
/// Weight each anchor output adds to the commitment transaction.
pub const ANCHOR_OUTPUT_WEIGHT: u64 = 172;
/// Weight of an HTLC-timeout transaction (spends an offered HTLC).
pub const HTLC_TIMEOUT_TX_WEIGHT: u64 = 663;
/// Weight of an HTLC-success transaction (spends a received HTLC).
pub const HTLC_SUCCESS_TX_WEIGHT: u64 = 703;

/// Total commitment weight for the given number of surviving HTLCs.
pub fn commitment_tx_weight(num_included_htlcs: usize, include_anchors: bool) -> u64 {
    let mut weight =
        COMMITMENT_TX_BASE_WEIGHT + COMMITMENT_TX_WEIGHT_PER_HTLC * num_included_htlcs as u64;
    if include_anchors {
        weight += 2 * ANCHOR_OUTPUT_WEIGHT;
    }
    weight
}

/// Commitment fee, rounded up.
pub fn commitment_tx_fee(feerate_per_kw: u64, weight: u64) -> u64 {
    (feerate_per_kw * weight + 999) / 1000
}

/// Fee of the second-stage HTLC-timeout transaction. Zero on anchor
/// channels, where HTLC transactions are signed with zero fee and bumped
/// externally.
pub fn htlc_timeout_tx_fee(feerate_per_kw: u64, anchors: bool) -> u64 {
    if anchors {
        0
    } else {
        feerate_per_kw * HTLC_TIMEOUT_TX_WEIGHT / 1000
    }
}

/// Fee of the second-stage HTLC-success transaction; see
/// [`htlc_timeout_tx_fee`] for the anchor case.
pub fn htlc_success_tx_fee(feerate_per_kw: u64, anchors: bool) -> u64 {
    if anchors {
        0
    } else {
        feerate_per_kw * HTLC_SUCCESS_TX_WEIGHT / 1000
    }
}

/// Whether an HTLC must be trimmed from the commitment transaction.
///
/// The threshold accounts for the fee of the second-stage transaction that
/// would spend the output, which differs by direction.
pub fn htlc_is_dust(htlc: &HtlcOutput, dust_limit_satoshis: u64, feerate_per_kw: u64, anchors: bool) -> bool {
    let second_stage_fee = match htlc.direction {
        HtlcDirection::Offered => htlc_timeout_tx_fee(feerate_per_kw, anchors),
        HtlcDirection::Received => htlc_success_tx_fee(feerate_per_kw, anchors),
    };
    htlc.amount_sat() < dust_limit_satoshis + second_stage_fee
}
