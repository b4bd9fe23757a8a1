use bitcoin::hash_types::Txid;
use bitcoin::script::ScriptBuf;
use bitcoin::secp256k1::PublicKey;
use bitcoin::OutPoint;

use crate::scripts::funding_redeem_script;

/// The confirmed 2-of-2 funding output every commitment transaction spends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingOutput {
    pub txid: Txid,
    pub vout: u32,
    pub value_satoshis: u64,
    pub local_funding_pubkey: PublicKey,
    pub remote_funding_pubkey: PublicKey,
}

impl FundingOutput {
    pub fn outpoint(&self) -> OutPoint {
        OutPoint { txid: self.txid, vout: self.vout }
    }

    /// The 2-of-2 witness script, with pubkeys in lexicographic order.
    pub fn redeem_script(&self) -> ScriptBuf {
        funding_redeem_script(&self.local_funding_pubkey, &self.remote_funding_pubkey)
    }

    pub fn script_pubkey(&self) -> ScriptBuf {
        self.redeem_script().to_p2wsh()
    }
}
