pub mod anchor;
pub mod commitment;
pub mod funding;
pub mod htlc;

pub use anchor::anchor_script;
pub use commitment::{to_local_script, to_remote_anchor_script, to_remote_script};
pub use funding::funding_redeem_script;
pub use htlc::{offered_htlc_script, received_htlc_script};
