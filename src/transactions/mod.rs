pub mod commitment;
pub mod fees;
pub mod funding;
pub mod htlc;
