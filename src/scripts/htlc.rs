use bitcoin::blockdata::opcodes::all as opcodes;
use bitcoin::hashes::hash160::Hash as Hash160;
use bitcoin::hashes::ripemd160::Hash as Ripemd160;
use bitcoin::hashes::Hash;
use bitcoin::script::{Builder, ScriptBuf};
use bitcoin::secp256k1::PublicKey;

/// Witness script for an HTLC we offered: the remote side claims with the
/// payment preimage, we reclaim via the 2-of-2 HTLC-timeout path, and the
/// revocation key sweeps everything on a revoked state.
///
/// With anchors, a 1-block CSV is appended so carve-out rules apply.
pub fn offered_htlc_script(
    revocation_pubkey: &PublicKey,
    local_htlc_pubkey: &PublicKey,
    remote_htlc_pubkey: &PublicKey,
    payment_hash: &[u8; 32],
    anchors: bool,
) -> ScriptBuf {
    let payment_hash160 = Ripemd160::hash(payment_hash);
    let revocation_key_hash = Hash160::hash(&revocation_pubkey.serialize());

    let mut bldr = Builder::new()
        .push_opcode(opcodes::OP_DUP)
        .push_opcode(opcodes::OP_HASH160)
        .push_slice(revocation_key_hash.as_byte_array())
        .push_opcode(opcodes::OP_EQUAL)
        .push_opcode(opcodes::OP_IF)
        .push_opcode(opcodes::OP_CHECKSIG)
        .push_opcode(opcodes::OP_ELSE)
        .push_slice(remote_htlc_pubkey.serialize())
        .push_opcode(opcodes::OP_SWAP)
        .push_opcode(opcodes::OP_SIZE)
        .push_int(32)
        .push_opcode(opcodes::OP_EQUAL)
        .push_opcode(opcodes::OP_NOTIF)
        .push_opcode(opcodes::OP_DROP)
        .push_int(2)
        .push_opcode(opcodes::OP_SWAP)
        .push_slice(local_htlc_pubkey.serialize())
        .push_int(2)
        .push_opcode(opcodes::OP_CHECKMULTISIG)
        .push_opcode(opcodes::OP_ELSE)
        .push_opcode(opcodes::OP_HASH160)
        .push_slice(payment_hash160.as_byte_array())
        .push_opcode(opcodes::OP_EQUALVERIFY)
        .push_opcode(opcodes::OP_CHECKSIG)
        .push_opcode(opcodes::OP_ENDIF);
    if anchors {
        bldr = bldr
            .push_int(1)
            .push_opcode(opcodes::OP_CSV)
            .push_opcode(opcodes::OP_DROP);
    }
    bldr.push_opcode(opcodes::OP_ENDIF).into_script()
}

/// Witness script for an HTLC offered to us: we claim via the 2-of-2
/// HTLC-success path with the preimage, the remote side reclaims after the
/// CLTV timeout, and the revocation key sweeps on a revoked state.
pub fn received_htlc_script(
    revocation_pubkey: &PublicKey,
    local_htlc_pubkey: &PublicKey,
    remote_htlc_pubkey: &PublicKey,
    payment_hash: &[u8; 32],
    cltv_expiry: u32,
    anchors: bool,
) -> ScriptBuf {
    let payment_hash160 = Ripemd160::hash(payment_hash);
    let revocation_key_hash = Hash160::hash(&revocation_pubkey.serialize());

    let mut bldr = Builder::new()
        .push_opcode(opcodes::OP_DUP)
        .push_opcode(opcodes::OP_HASH160)
        .push_slice(revocation_key_hash.as_byte_array())
        .push_opcode(opcodes::OP_EQUAL)
        .push_opcode(opcodes::OP_IF)
        .push_opcode(opcodes::OP_CHECKSIG)
        .push_opcode(opcodes::OP_ELSE)
        .push_slice(remote_htlc_pubkey.serialize())
        .push_opcode(opcodes::OP_SWAP)
        .push_opcode(opcodes::OP_SIZE)
        .push_int(32)
        .push_opcode(opcodes::OP_EQUAL)
        .push_opcode(opcodes::OP_IF)
        .push_opcode(opcodes::OP_HASH160)
        .push_slice(payment_hash160.as_byte_array())
        .push_opcode(opcodes::OP_EQUALVERIFY)
        .push_int(2)
        .push_opcode(opcodes::OP_SWAP)
        .push_slice(local_htlc_pubkey.serialize())
        .push_int(2)
        .push_opcode(opcodes::OP_CHECKMULTISIG)
        .push_opcode(opcodes::OP_ELSE)
        .push_opcode(opcodes::OP_DROP)
        .push_int(cltv_expiry as i64)
        .push_opcode(opcodes::OP_CLTV)
        .push_opcode(opcodes::OP_DROP)
        .push_opcode(opcodes::OP_CHECKSIG)
        .push_opcode(opcodes::OP_ENDIF);
    if anchors {
        bldr = bldr
            .push_int(1)
            .push_opcode(opcodes::OP_CSV)
            .push_opcode(opcodes::OP_DROP);
    }
    bldr.push_opcode(opcodes::OP_ENDIF).into_script()
}
