/// Direction of an in-flight HTLC, from the perspective of the party whose
/// commitment transaction is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtlcDirection {
    /// We offered this HTLC; the counterparty can claim it with the preimage,
    /// we can reclaim it after the CLTV timeout.
    Offered,
    /// The counterparty offered this HTLC to us.
    Received,
}

/// An in-flight HTLC as it appears (or would appear, if not trimmed) in a
/// commitment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtlcOutput {
    pub direction: HtlcDirection,
    pub amount_msat: u64,
    /// SHA256 of the payment preimage.
    pub payment_hash: [u8; 32],
    /// Absolute timeout height. Used by the received-HTLC script, and by
    /// both directions as the deterministic ordering tie-break.
    pub cltv_expiry: u32,
}

impl HtlcOutput {
    /// The on-chain output value; sub-satoshi msat precision is rounded down.
    pub fn amount_sat(&self) -> u64 {
        self.amount_msat / 1000
    }
}
