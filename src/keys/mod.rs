pub mod commitment;
pub mod derivation;
pub mod shachain;
