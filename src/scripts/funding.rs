use bitcoin::blockdata::opcodes::all as opcodes;
use bitcoin::script::{Builder, ScriptBuf};
use bitcoin::secp256k1::PublicKey;

/// 2-of-2 multisig witness script for the channel funding output.
///
/// Keys are sorted by compressed serialization so both parties build the
/// identical script regardless of which side they are.
pub fn funding_redeem_script(pubkey1: &PublicKey, pubkey2: &PublicKey) -> ScriptBuf {
    let (lesser, greater) = if pubkey1.serialize() < pubkey2.serialize() {
        (pubkey1, pubkey2)
    } else {
        (pubkey2, pubkey1)
    };
    Builder::new()
        .push_int(2)
        .push_slice(lesser.serialize())
        .push_slice(greater.serialize())
        .push_int(2)
        .push_opcode(opcodes::OP_CHECKMULTISIG)
        .into_script()
}
