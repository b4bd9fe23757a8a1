/// Default dust limit for P2WSH commitment outputs, in satoshis.
pub const DEFAULT_DUST_LIMIT_SATOSHIS: u64 = 546;

/// Fixed value of each anchor output, in satoshis.
pub const ANCHOR_OUTPUT_VALUE_SATOSHIS: u64 = 330;

/// Optional fee-sanity bounds checked before building a commitment
/// transaction. A violation is reported to the caller, never silently
/// corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    pub min_feerate_per_kw: u64,
    pub max_feerate_per_kw: u64,
}

/// Node-level channel configuration, passed explicitly into every factory
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Outputs below this value are omitted from the commitment transaction.
    pub dust_limit_satoshis: u64,
    /// Whether this channel uses the anchor-outputs (zero-fee HTLC
    /// transaction) format.
    pub anchors_enabled: bool,
    /// Value of each anchor output when anchors are enabled.
    pub anchor_value_satoshis: u64,
    /// Optional strict fee-sanity check.
    pub fee_policy: Option<FeePolicy>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            dust_limit_satoshis: DEFAULT_DUST_LIMIT_SATOSHIS,
            anchors_enabled: false,
            anchor_value_satoshis: ANCHOR_OUTPUT_VALUE_SATOSHIS,
            fee_policy: None,
        }
    }
}

impl ChannelConfig {
    /// Configuration for an anchor-outputs channel with default limits.
    pub fn with_anchors() -> Self {
        Self { anchors_enabled: true, ..Self::default() }
    }
}
