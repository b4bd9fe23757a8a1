//! Commitment transaction construction.
//!
//! Both channel parties must produce byte-identical transactions from the
//! shared channel state, so everything here is deterministic: HTLC trimming,
//! fee deduction, anchor inclusion and output ordering all follow fixed
//! rules with no ambient input.

use bitcoin::hash_types::Txid;
use bitcoin::hashes::sha256::Hash as Sha256;
use bitcoin::hashes::{Hash, HashEngine};
use bitcoin::locktime::absolute::LockTime;
use bitcoin::script::ScriptBuf;
use bitcoin::secp256k1::{ecdsa::Signature, All, PublicKey, Secp256k1, SecretKey};
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Sequence, Transaction, TxIn, TxOut, Witness};

use crate::config::ChannelConfig;
use crate::error::TxBuildError;
use crate::keys::commitment::CommitmentKeys;
use crate::scripts::{
    anchor_script, offered_htlc_script, received_htlc_script, to_local_script,
    to_remote_anchor_script, to_remote_script,
};
use crate::signing::{sign_transaction_input, verify_transaction_signature};
use crate::transactions::fees::{commitment_tx_fee, commitment_tx_weight, htlc_is_dust};
use crate::transactions::funding::FundingOutput;
use crate::types::{HtlcDirection, HtlcOutput};

/// Obscure factor XORed into the commitment number before it is split across
/// the locktime and sequence fields: the low 48 bits of
/// `SHA256(initiator_payment_basepoint || receiver_payment_basepoint)`.
pub fn get_commitment_transaction_number_obscure_factor(
    initiator_payment_basepoint: &PublicKey,
    receiver_payment_basepoint: &PublicKey,
) -> u64 {
    let mut sha = Sha256::engine();

    sha.input(&initiator_payment_basepoint.serialize());
    sha.input(&receiver_payment_basepoint.serialize());

    let res = Sha256::from_engine(sha).to_byte_array();

    ((res[26] as u64) << 5 * 8)
        | ((res[27] as u64) << 4 * 8)
        | ((res[28] as u64) << 3 * 8)
        | ((res[29] as u64) << 2 * 8)
        | ((res[30] as u64) << 1 * 8)
        | ((res[31] as u64) << 0 * 8)
}

/// One output of the transaction before ordering, with the metadata the
/// BOLT3 sort needs and, for HTLCs, the source HTLC.
struct OutputWithMetadata {
    value: u64,
    script_pubkey: ScriptBuf,
    cltv_expiry: Option<u32>,
    htlc: Option<HtlcOutput>,
}

/// All inputs needed to build one party's commitment transaction for one
/// state. "Local" is the party whose transaction this is; balances are
/// pre-fee, in millisatoshis.
pub struct CommitmentTransactionBuilder<'a> {
    pub funding: &'a FundingOutput,
    pub keys: &'a CommitmentKeys,
    /// The local party's payment basepoint; on non-anchor channels the
    /// counterparty's copy of this keys our `to_remote` on their transaction.
    pub local_payment_basepoint: &'a PublicKey,
    pub remote_payment_basepoint: &'a PublicKey,
    pub to_local_msat: u64,
    pub to_remote_msat: u64,
    pub to_self_delay: u16,
    /// Forward commitment number, counting up from zero.
    pub commitment_number: u64,
    /// Whether the local party funded the channel and therefore pays the
    /// commitment fee (and anchor values).
    pub local_is_funder: bool,
    pub htlcs: &'a [HtlcOutput],
    pub feerate_per_kw: u64,
    pub config: &'a ChannelConfig,
    pub local_funding_key: &'a SecretKey,
}

impl<'a> CommitmentTransactionBuilder<'a> {
    /// Builds the unsigned commitment transaction.
    ///
    /// Trimmed HTLC values and sub-dust balances are absorbed into the fee;
    /// the funder's balance is clamped at zero rather than going negative.
    pub fn build(&self, secp_ctx: &Secp256k1<All>) -> Result<CommitmentTransaction, TxBuildError> {
        if let Some(policy) = &self.config.fee_policy {
            if self.feerate_per_kw < policy.min_feerate_per_kw
                || self.feerate_per_kw > policy.max_feerate_per_kw
            {
                return Err(TxBuildError::FeePolicyViolation {
                    feerate_per_kw: self.feerate_per_kw,
                    min: policy.min_feerate_per_kw,
                    max: policy.max_feerate_per_kw,
                });
            }
        }

        let anchors = self.config.anchors_enabled;

        let kept_htlcs: Vec<&HtlcOutput> = self
            .htlcs
            .iter()
            .filter(|htlc| {
                !htlc_is_dust(htlc, self.config.dust_limit_satoshis, self.feerate_per_kw, anchors)
            })
            .collect();
        let any_htlcs = !kept_htlcs.is_empty();

        // Anchors carry weight and cost only when the transaction will have
        // something to anchor: an HTLC, or a balance that can still reach
        // the dust limit before the fee is taken out.
        let include_anchors = anchors
            && (any_htlcs
                || self.to_local_msat / 1000 >= self.config.dust_limit_satoshis
                || self.to_remote_msat / 1000 >= self.config.dust_limit_satoshis);

        let weight = commitment_tx_weight(kept_htlcs.len(), include_anchors);
        let fee = commitment_tx_fee(self.feerate_per_kw, weight);

        // The funder also carries both anchor output values.
        let funder_cost = if include_anchors {
            fee + 2 * self.config.anchor_value_satoshis
        } else {
            fee
        };

        let mut to_local_sat = self.to_local_msat / 1000;
        let mut to_remote_sat = self.to_remote_msat / 1000;
        if self.local_is_funder {
            to_local_sat = to_local_sat.saturating_sub(funder_cost);
        } else {
            to_remote_sat = to_remote_sat.saturating_sub(funder_cost);
        }

        let mut outputs: Vec<OutputWithMetadata> = Vec::new();

        let include_to_remote = to_remote_sat >= self.config.dust_limit_satoshis;
        if include_to_remote {
            let script_pubkey = if anchors {
                to_remote_anchor_script(self.remote_payment_basepoint).to_p2wsh()
            } else {
                to_remote_script(self.remote_payment_basepoint)
            };
            outputs.push(OutputWithMetadata {
                value: to_remote_sat,
                script_pubkey,
                cltv_expiry: None,
                htlc: None,
            });
        }

        let include_to_local = to_local_sat >= self.config.dust_limit_satoshis;
        if include_to_local {
            let script = to_local_script(
                &self.keys.revocation_key,
                &self.keys.local_delayed_payment_key,
                self.to_self_delay,
            );
            outputs.push(OutputWithMetadata {
                value: to_local_sat,
                script_pubkey: script.to_p2wsh(),
                cltv_expiry: None,
                htlc: None,
            });
        }

        if include_anchors {
            // Each side's anchor exists only if that side has something to
            // bump: its balance output, or any HTLC output.
            let mut include_local_anchor = include_to_local || any_htlcs;
            let mut include_remote_anchor = include_to_remote || any_htlcs;

            // The funder pays for the anchors, so an anchor can only exist
            // if the funder's post-fee balance covers its value. When it
            // cannot cover both, the funder's own anchor is dropped first.
            let funder_msat =
                if self.local_is_funder { self.to_local_msat } else { self.to_remote_msat };
            let funder_sat_after_fee = (funder_msat / 1000).saturating_sub(fee);
            let mut fundable_anchors = if self.config.anchor_value_satoshis == 0 {
                2
            } else {
                funder_sat_after_fee / self.config.anchor_value_satoshis
            };
            let (peer_anchor, own_anchor) = if self.local_is_funder {
                (&mut include_remote_anchor, &mut include_local_anchor)
            } else {
                (&mut include_local_anchor, &mut include_remote_anchor)
            };
            for flag in [peer_anchor, own_anchor] {
                if *flag {
                    if fundable_anchors > 0 {
                        fundable_anchors -= 1;
                    } else {
                        *flag = false;
                    }
                }
            }

            if include_local_anchor {
                outputs.push(OutputWithMetadata {
                    value: self.config.anchor_value_satoshis,
                    script_pubkey: anchor_script(&self.funding.local_funding_pubkey).to_p2wsh(),
                    cltv_expiry: None,
                    htlc: None,
                });
            }
            if include_remote_anchor {
                outputs.push(OutputWithMetadata {
                    value: self.config.anchor_value_satoshis,
                    script_pubkey: anchor_script(&self.funding.remote_funding_pubkey).to_p2wsh(),
                    cltv_expiry: None,
                    htlc: None,
                });
            }
        }

        for htlc in &kept_htlcs {
            let script = match htlc.direction {
                HtlcDirection::Offered => offered_htlc_script(
                    &self.keys.revocation_key,
                    &self.keys.local_htlc_key,
                    &self.keys.remote_htlc_key,
                    &htlc.payment_hash,
                    anchors,
                ),
                HtlcDirection::Received => received_htlc_script(
                    &self.keys.revocation_key,
                    &self.keys.local_htlc_key,
                    &self.keys.remote_htlc_key,
                    &htlc.payment_hash,
                    htlc.cltv_expiry,
                    anchors,
                ),
            };
            outputs.push(OutputWithMetadata {
                value: htlc.amount_sat(),
                script_pubkey: script.to_p2wsh(),
                cltv_expiry: Some(htlc.cltv_expiry),
                htlc: Some((*htlc).clone()),
            });
        }

        sort_outputs(&mut outputs);

        let included_htlcs: Vec<(u32, HtlcOutput)> = outputs
            .iter()
            .enumerate()
            .filter_map(|(idx, out)| out.htlc.clone().map(|h| (idx as u32, h)))
            .collect();

        let tx_outputs: Vec<TxOut> = outputs
            .iter()
            .map(|out| TxOut {
                value: Amount::from_sat(out.value),
                script_pubkey: out.script_pubkey.clone(),
            })
            .collect();

        let output_total: u64 = outputs.iter().map(|out| out.value).sum();

        let mut tx = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: self.funding.outpoint(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: tx_outputs,
        };
        self.set_obscured_commitment_number(&mut tx);

        log::trace!(
            "built commitment tx {} for number {}: {} outputs, {} htlcs kept of {}, fee {}",
            tx.compute_txid(),
            self.commitment_number,
            tx.output.len(),
            kept_htlcs.len(),
            self.htlcs.len(),
            self.funding.value_satoshis - output_total,
        );

        Ok(CommitmentTransaction {
            transaction: tx,
            // Trimmed HTLCs and clamped balances all land here, so the
            // output values plus this fee always equal the funding value.
            fee_satoshis: self.funding.value_satoshis - output_total,
            included_htlcs,
            funding: self.funding.clone(),
            local_funding_key: *self.local_funding_key,
        })
    }

    /// Hides the commitment number in the locktime (lower 24 bits) and the
    /// funding input sequence (upper 24 bits), XORed with the channel's
    /// obscure factor. The factor hashes the initiator's basepoint first.
    fn set_obscured_commitment_number(&self, tx: &mut Transaction) {
        let obscure_factor = if self.local_is_funder {
            get_commitment_transaction_number_obscure_factor(
                self.local_payment_basepoint,
                self.remote_payment_basepoint,
            )
        } else {
            get_commitment_transaction_number_obscure_factor(
                self.remote_payment_basepoint,
                self.local_payment_basepoint,
            )
        };

        let obscured_commitment_number = obscure_factor ^ self.commitment_number;

        let locktime_value =
            ((0x20 as u32) << 8 * 3) | ((obscured_commitment_number & 0xffffffu64) as u32);
        tx.lock_time = LockTime::from_consensus(locktime_value);

        let sequence_value =
            Sequence(((0x80 as u32) << 8 * 3) | ((obscured_commitment_number >> 3 * 8) as u32));
        tx.input[0].sequence = sequence_value;
    }
}

/// BOLT3 (BIP69-style) output ordering: value, then scriptPubkey bytes, then
/// CLTV expiry as the tie-break between identical HTLC outputs.
fn sort_outputs(outputs: &mut Vec<OutputWithMetadata>) {
    outputs.sort_by(|a, b| {
        a.value
            .cmp(&b.value)
            .then(a.script_pubkey.cmp(&b.script_pubkey))
            .then(a.cltv_expiry.cmp(&b.cltv_expiry))
    });
}

/// A built commitment transaction, with the metadata a caller needs to sign
/// it and to locate its HTLC outputs.
pub struct CommitmentTransaction {
    /// The unsigned transaction; the funding input witness is empty.
    pub transaction: Transaction,
    /// Everything not paid to an output, i.e. the mining fee including
    /// trimmed HTLC values.
    pub fee_satoshis: u64,
    /// Surviving HTLCs with their output index, in output order.
    pub included_htlcs: Vec<(u32, HtlcOutput)>,
    funding: FundingOutput,
    local_funding_key: SecretKey,
}

impl CommitmentTransaction {
    pub fn txid(&self) -> Txid {
        self.transaction.compute_txid()
    }

    /// Verifies the counterparty's funding signature, produces our own, and
    /// returns the fully signed transaction ready for broadcast.
    ///
    /// The witness stack places the signature of the lexicographically
    /// lesser funding pubkey first, matching the sorted 2-of-2 script.
    pub fn append_remote_signature_and_sign(
        &self,
        remote_signature: &Signature,
        secp_ctx: &Secp256k1<All>,
    ) -> Result<Transaction, TxBuildError> {
        let redeem_script = self.funding.redeem_script();

        verify_transaction_signature(
            &self.transaction,
            0,
            &redeem_script,
            self.funding.value_satoshis,
            remote_signature,
            &self.funding.remote_funding_pubkey,
            secp_ctx,
        )?;

        let local_sig = sign_transaction_input(
            &self.transaction,
            0,
            &redeem_script,
            self.funding.value_satoshis,
            &self.local_funding_key,
            secp_ctx,
        )?;

        let mut remote_sig = remote_signature.serialize_der().to_vec();
        remote_sig.push(bitcoin::sighash::EcdsaSighashType::All as u8);

        let local_first = self.funding.local_funding_pubkey.serialize()
            < self.funding.remote_funding_pubkey.serialize();
        let witness = if local_first {
            Witness::from_slice(&[
                &[][..], // CHECKMULTISIG consumes an extra stack element
                &local_sig[..],
                &remote_sig[..],
                redeem_script.as_bytes(),
            ])
        } else {
            Witness::from_slice(&[
                &[][..],
                &remote_sig[..],
                &local_sig[..],
                redeem_script.as_bytes(),
            ])
        };

        let mut signed_tx = self.transaction.clone();
        signed_tx.input[0].witness = witness;
        Ok(signed_tx)
    }

    /// Outpoint of the HTLC at commitment output index `output_index`, for
    /// building the second-stage transaction that spends it.
    pub fn htlc_outpoint(&self, output_index: u32) -> OutPoint {
        OutPoint { txid: self.txid(), vout: output_index }
    }
}
