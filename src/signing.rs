//! Segwit v0 signing helpers shared by commitment and second-stage
//! transactions. All signatures are `SIGHASH_ALL` over the P2WSH witness
//! script of the input being spent.

use bitcoin::hashes::Hash;
use bitcoin::script::ScriptBuf;
use bitcoin::secp256k1::{ecdsa::Signature, All, Message, PublicKey, Secp256k1, SecretKey};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::{Amount, Transaction};

use crate::error::TxBuildError;

/// Signs one P2WSH input of `tx` and returns the DER signature with the
/// `SIGHASH_ALL` byte appended, ready to be placed on a witness stack.
pub fn sign_transaction_input(
    tx: &Transaction,
    input_index: usize,
    witness_script: &ScriptBuf,
    amount_satoshis: u64,
    secret_key: &SecretKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<Vec<u8>, TxBuildError> {
    let mut sighash_cache = SighashCache::new(tx);
    let sighash = sighash_cache
        .p2wsh_signature_hash(
            input_index,
            witness_script,
            Amount::from_sat(amount_satoshis),
            EcdsaSighashType::All,
        )
        .map_err(|e| TxBuildError::Sighash(e.to_string()))?;

    let msg = Message::from_digest(sighash.to_byte_array());
    let sig = secp_ctx.sign_ecdsa(&msg, secret_key);

    let mut sig_bytes = sig.serialize_der().to_vec();
    sig_bytes.push(EcdsaSighashType::All as u8);
    Ok(sig_bytes)
}

/// Verifies a counterparty signature against one P2WSH input of `tx`.
///
/// `signature` is the bare compact/DER-parsed secp256k1 signature without a
/// sighash byte, as it travels in `commitment_signed`.
pub fn verify_transaction_signature(
    tx: &Transaction,
    input_index: usize,
    witness_script: &ScriptBuf,
    amount_satoshis: u64,
    signature: &Signature,
    pubkey: &PublicKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<(), TxBuildError> {
    let mut sighash_cache = SighashCache::new(tx);
    let sighash = sighash_cache
        .p2wsh_signature_hash(
            input_index,
            witness_script,
            Amount::from_sat(amount_satoshis),
            EcdsaSighashType::All,
        )
        .map_err(|e| TxBuildError::Sighash(e.to_string()))?;

    let msg = Message::from_digest(sighash.to_byte_array());
    secp_ctx
        .verify_ecdsa(&msg, signature, pubkey)
        .map_err(|_| TxBuildError::InvalidSignature)
}
