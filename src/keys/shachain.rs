//! Compact storage of the counterparty's revealed per-commitment secrets.
//!
//! Storing every revealed secret would grow linearly with channel lifetime.
//! Because secrets form a hash chain keyed by a 48-bit countdown index, a
//! secret whose index has `b` trailing zero bits can re-derive every already
//! revealed secret sharing its high-order bits. Keeping only the newest
//! secret per trailing-zero count bounds storage at 49 slots with O(48)
//! worst-case derivation.

use bitcoin::hashes::sha256::Hash as Sha256;
use bitcoin::hashes::Hash;

use crate::error::ShachainError;

/// Sentinel index marking an empty slot; real indices are below `2^48`.
const EMPTY_SLOT: u64 = 1 << 48;

/// Fixed 49-slot store of revealed per-commitment secrets.
///
/// Owned exclusively by one channel for its whole lifetime and driven
/// sequentially by that channel's revocation flow; callers that might insert
/// concurrently must serialize externally.
#[derive(Clone, Debug)]
pub struct SecretStore {
    slots: [([u8; 32], u64); 49],
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Eq for SecretStore {}
impl PartialEq for SecretStore {
    fn eq(&self, other: &Self) -> bool {
        self.slots.iter().zip(other.slots.iter()).all(|(a, b)| a == b)
    }
}

impl SecretStore {
    pub fn new() -> Self {
        Self { slots: [([0; 32], EMPTY_SLOT); 49] }
    }

    /// Number of trailing zero bits of `idx`, the slot it belongs in.
    fn place(idx: u64) -> u8 {
        for b in 0..48 {
            if idx & (1 << b) == (1 << b) {
                return b;
            }
        }
        48
    }

    /// Hash-chains `secret` from its own index down toward `idx`, flipping
    /// and hashing once per set bit among the low `bits` bits of `idx`.
    fn derive_secret(secret: [u8; 32], bits: u8, idx: u64) -> [u8; 32] {
        let mut res = secret;
        for i in 0..bits {
            let bitpos = bits - 1 - i;
            if idx & (1 << bitpos) == (1 << bitpos) {
                res[(bitpos / 8) as usize] ^= 1 << (bitpos & 7);
                res = Sha256::hash(&res).to_byte_array();
            }
        }
        res
    }

    /// The smallest (most recent) index of all stored secrets, or `2^48` if
    /// the store is empty.
    pub fn min_seen_index(&self) -> u64 {
        self.slots.iter().map(|&(_, idx)| idx).min().unwrap_or(EMPTY_SLOT)
    }

    /// Inserts the secret revealed for `idx`.
    ///
    /// Every populated lower slot must be re-derivable from the new secret;
    /// any mismatch leaves the store unchanged and returns `false`. That is
    /// a protocol violation by the counterparty, and the caller must treat
    /// it as a channel breach, not a recoverable error. An index at or above
    /// the minimum already seen is a replay and is accepted without
    /// overwriting newer state.
    pub fn insert_secret(&mut self, secret: [u8; 32], idx: u64) -> bool {
        let pos = Self::place(idx);
        for b in 0..pos {
            let (old_secret, old_idx) = self.slots[b as usize];
            if old_idx == EMPTY_SLOT {
                continue;
            }
            if Self::derive_secret(secret, pos, old_idx) != old_secret {
                log::warn!("secret for index {} is inconsistent with stored chain", idx);
                return false;
            }
        }
        if self.min_seen_index() <= idx {
            return true;
        }
        log::debug!("storing per-commitment secret for index {} in slot {}", idx, pos);
        self.slots[pos as usize] = (secret, idx);
        true
    }

    /// Re-derives the secret for `idx` from the stored slot that covers it.
    /// Indices at or above `2^48` do not exist and are never derivable.
    pub fn derive_old_secret(&self, idx: u64) -> Result<[u8; 32], ShachainError> {
        if idx >= EMPTY_SLOT {
            return Err(ShachainError::Underivable(idx));
        }
        for b in 0..self.slots.len() {
            let (secret, stored_idx) = self.slots[b];
            if idx & !((1u64 << b) - 1) == stored_idx {
                return Ok(Self::derive_secret(secret, b as u8, idx));
            }
        }
        Err(ShachainError::Underivable(idx))
    }
}
