//! Second-stage HTLC transactions.
//!
//! Each non-dust HTLC output on a commitment transaction is spent by a
//! pre-signed 2-of-2 transaction that converts it into a revokeable
//! `to_local`-style output: HTLC-success (received HTLCs, claimed with the
//! preimage) or HTLC-timeout (offered HTLCs, valid after the CLTV expiry).

use bitcoin::locktime::absolute::LockTime;
use bitcoin::script::ScriptBuf;
use bitcoin::secp256k1::PublicKey;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Sequence, Transaction, TxIn, TxOut, Witness};

use crate::scripts::to_local_script;
use crate::transactions::fees::{htlc_success_tx_fee, htlc_timeout_tx_fee};

fn build_htlc_tx(
    htlc_outpoint: OutPoint,
    output_value: u64,
    lock_time: u32,
    to_self_delay: u16,
    revocation_pubkey: &PublicKey,
    local_delayed_pubkey: &PublicKey,
    anchors: bool,
) -> Transaction {
    let output_script =
        to_local_script(revocation_pubkey, local_delayed_pubkey, to_self_delay).to_p2wsh();

    Transaction {
        version: Version::TWO,
        lock_time: LockTime::from_consensus(lock_time),
        input: vec![TxIn {
            previous_output: htlc_outpoint,
            script_sig: ScriptBuf::new(),
            // Anchor channels put a 1-block CSV on the HTLC script, so the
            // spending input must assert that relative height.
            sequence: Sequence(if anchors { 1 } else { 0 }),
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::from_sat(output_value),
            script_pubkey: output_script,
        }],
    }
}

/// Unsigned HTLC-success transaction for a received HTLC.
pub fn build_htlc_success_tx(
    htlc_outpoint: OutPoint,
    htlc_amount_satoshis: u64,
    feerate_per_kw: u64,
    to_self_delay: u16,
    revocation_pubkey: &PublicKey,
    local_delayed_pubkey: &PublicKey,
    anchors: bool,
) -> Transaction {
    let fee = htlc_success_tx_fee(feerate_per_kw, anchors);
    build_htlc_tx(
        htlc_outpoint,
        htlc_amount_satoshis - fee,
        0,
        to_self_delay,
        revocation_pubkey,
        local_delayed_pubkey,
        anchors,
    )
}

/// Unsigned HTLC-timeout transaction for an offered HTLC. The locktime is
/// the HTLC's CLTV expiry; the transaction is unbroadcastable before it.
pub fn build_htlc_timeout_tx(
    htlc_outpoint: OutPoint,
    htlc_amount_satoshis: u64,
    cltv_expiry: u32,
    feerate_per_kw: u64,
    to_self_delay: u16,
    revocation_pubkey: &PublicKey,
    local_delayed_pubkey: &PublicKey,
    anchors: bool,
) -> Transaction {
    let fee = htlc_timeout_tx_fee(feerate_per_kw, anchors);
    build_htlc_tx(
        htlc_outpoint,
        htlc_amount_satoshis - fee,
        cltv_expiry,
        to_self_delay,
        revocation_pubkey,
        local_delayed_pubkey,
        anchors,
    )
}

/// Witness for the HTLC-success path:
/// `[0, remote_htlc_sig, local_htlc_sig, payment_preimage, htlc_script]`.
pub fn htlc_success_witness(
    remote_htlc_signature: &[u8],
    local_htlc_signature: &[u8],
    payment_preimage: &[u8; 32],
    htlc_script: &ScriptBuf,
) -> Witness {
    Witness::from_slice(&[
        &[][..], // CHECKMULTISIG consumes an extra stack element
        remote_htlc_signature,
        local_htlc_signature,
        &payment_preimage[..],
        htlc_script.as_bytes(),
    ])
}

/// Witness for the HTLC-timeout path:
/// `[0, remote_htlc_sig, local_htlc_sig, <empty>, htlc_script]`.
pub fn htlc_timeout_witness(
    remote_htlc_signature: &[u8],
    local_htlc_signature: &[u8],
    htlc_script: &ScriptBuf,
) -> Witness {
    Witness::from_slice(&[
        &[][..],
        remote_htlc_signature,
        local_htlc_signature,
        &[][..], // selects the timeout branch
        htlc_script.as_bytes(),
    ])
}
