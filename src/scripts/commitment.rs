use bitcoin::blockdata::opcodes::all as opcodes;
use bitcoin::hashes::hash160::Hash as Hash160;
use bitcoin::hashes::Hash;
use bitcoin::script::{Builder, ScriptBuf};
use bitcoin::secp256k1::PublicKey;

/// P2WPKH scriptPubkey for the counterparty's immediately-spendable
/// `to_remote` output (non-anchor channels).
///
/// Note this is the final scriptPubkey, not a witness script.
pub fn to_remote_script(remote_payment_key: &PublicKey) -> ScriptBuf {
    let pubkey_hash = Hash160::hash(&remote_payment_key.serialize());
    Builder::new()
        .push_int(0)
        .push_slice(pubkey_hash.as_byte_array())
        .into_script()
}

/// Witness script for the `to_remote` output on anchor channels: the plain
/// key gains a 1-block relative timelock so the anchor can be the only
/// immediately-spendable output.
pub fn to_remote_anchor_script(remote_payment_key: &PublicKey) -> ScriptBuf {
    Builder::new()
        .push_slice(remote_payment_key.serialize())
        .push_opcode(opcodes::OP_CHECKSIGVERIFY)
        .push_int(1)
        .push_opcode(opcodes::OP_CSV)
        .into_script()
}

/// Witness script for the broadcaster's `to_local` output: spendable by the
/// counterparty with the revocation key at any time, or by the broadcaster's
/// delayed key after `to_self_delay` blocks.
pub fn to_local_script(
    revocation_pubkey: &PublicKey,
    local_delayed_pubkey: &PublicKey,
    to_self_delay: u16,
) -> ScriptBuf {
    Builder::new()
        .push_opcode(opcodes::OP_IF)
        .push_slice(revocation_pubkey.serialize())
        .push_opcode(opcodes::OP_ELSE)
        .push_int(to_self_delay as i64)
        .push_opcode(opcodes::OP_CSV)
        .push_opcode(opcodes::OP_DROP)
        .push_slice(local_delayed_pubkey.serialize())
        .push_opcode(opcodes::OP_ENDIF)
        .push_opcode(opcodes::OP_CHECKSIG)
        .into_script()
}
