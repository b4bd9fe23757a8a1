//! BOLT3 per-commitment key and secret derivation.
//!
//! All functions here are pure and deterministic. Failures (zero scalars,
//! the point at infinity, an out-of-range index) are fatal to the calling
//! channel and never retried.

use bitcoin::hashes::sha256::Hash as Sha256;
use bitcoin::hashes::{Hash, HashEngine};
use bitcoin::secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};

use crate::error::KeyError;

/// SHA256(a || b) over the compressed serializations of the two points.
fn point_tweak(a: &PublicKey, b: &PublicKey) -> [u8; 32] {
    let mut engine = Sha256::engine();
    engine.input(&a.serialize());
    engine.input(&b.serialize());
    Sha256::from_engine(engine).to_byte_array()
}

/// Derives the per-commitment secret for `idx` from the 32-byte commitment
/// seed.
///
/// The index counts down from `2^48 - 1` for the first commitment. Starting
/// from the seed, one bit is flipped and the result hashed for every set bit
/// of the index, from bit 47 down to bit 0.
pub fn generate_per_commitment_secret(
    commitment_seed: &[u8; 32],
    idx: u64,
) -> Result<[u8; 32], KeyError> {
    if idx >= 1 << 48 {
        return Err(KeyError::IndexOutOfRange(idx));
    }
    let mut res = *commitment_seed;
    for i in 0..48 {
        let bitpos = 47 - i;
        if idx & (1 << bitpos) == (1 << bitpos) {
            res[bitpos / 8] ^= 1 << (bitpos & 7);
            res = Sha256::hash(&res).to_byte_array();
        }
    }
    Ok(res)
}

/// Derives the per-commitment point, the public counterpart of
/// [`generate_per_commitment_secret`].
pub fn derive_per_commitment_point(
    commitment_seed: &[u8; 32],
    idx: u64,
    secp_ctx: &Secp256k1<All>,
) -> Result<PublicKey, KeyError> {
    let secret = generate_per_commitment_secret(commitment_seed, idx)?;
    let secret_key = SecretKey::from_slice(&secret).map_err(|_| KeyError::InvalidKey)?;
    Ok(PublicKey::from_secret_key(secp_ctx, &secret_key))
}

/// `pubkey = basepoint + SHA256(per_commitment_point || basepoint) * G`.
pub fn derive_public_key(
    basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<PublicKey, KeyError> {
    let res = point_tweak(per_commitment_point, basepoint);
    let hashkey = PublicKey::from_secret_key(
        secp_ctx,
        &SecretKey::from_slice(&res).map_err(|_| KeyError::InvalidKey)?,
    );
    basepoint.combine(&hashkey).map_err(|_| KeyError::InvalidKey)
}

/// `privkey = base_secret + SHA256(per_commitment_point || basepoint) mod n`.
///
/// The private counterpart of [`derive_public_key`].
pub fn derive_private_key(
    base_secret: &SecretKey,
    per_commitment_point: &PublicKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<SecretKey, KeyError> {
    let basepoint = PublicKey::from_secret_key(secp_ctx, base_secret);
    let res = point_tweak(per_commitment_point, &basepoint);
    let tweak = Scalar::from_be_bytes(res).map_err(|_| KeyError::InvalidKey)?;
    base_secret.add_tweak(&tweak).map_err(|_| KeyError::InvalidKey)
}

/// `revocationpubkey = revocation_basepoint * SHA256(revocation_basepoint ||
/// per_commitment_point) + per_commitment_point *
/// SHA256(per_commitment_point || revocation_basepoint)`.
///
/// The blinded combination lets the counterparty punish a revoked state
/// without either party knowing the full key until the secret is revealed.
pub fn derive_revocation_public_key(
    revocation_basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<PublicKey, KeyError> {
    let hash1 = point_tweak(revocation_basepoint, per_commitment_point);
    let scalar1 = Scalar::from_be_bytes(hash1).map_err(|_| KeyError::InvalidKey)?;
    let part1 = revocation_basepoint
        .mul_tweak(secp_ctx, &scalar1)
        .map_err(|_| KeyError::InvalidKey)?;

    let hash2 = point_tweak(per_commitment_point, revocation_basepoint);
    let scalar2 = Scalar::from_be_bytes(hash2).map_err(|_| KeyError::InvalidKey)?;
    let part2 = per_commitment_point
        .mul_tweak(secp_ctx, &scalar2)
        .map_err(|_| KeyError::InvalidKey)?;

    part1.combine(&part2).map_err(|_| KeyError::InvalidKey)
}

/// Private counterpart of [`derive_revocation_public_key`], computable only
/// once both the revocation base secret and the per-commitment secret are
/// known.
pub fn derive_revocation_private_key(
    revocation_base_secret: &SecretKey,
    per_commitment_secret: &SecretKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<SecretKey, KeyError> {
    let revocation_basepoint = PublicKey::from_secret_key(secp_ctx, revocation_base_secret);
    let per_commitment_point = PublicKey::from_secret_key(secp_ctx, per_commitment_secret);

    let hash1 = point_tweak(&revocation_basepoint, &per_commitment_point);
    let scalar1 = Scalar::from_be_bytes(hash1).map_err(|_| KeyError::InvalidKey)?;
    let part1 = revocation_base_secret
        .mul_tweak(&scalar1)
        .map_err(|_| KeyError::InvalidKey)?;

    let hash2 = point_tweak(&per_commitment_point, &revocation_basepoint);
    let scalar2 = Scalar::from_be_bytes(hash2).map_err(|_| KeyError::InvalidKey)?;
    let part2 = per_commitment_secret
        .mul_tweak(&scalar2)
        .map_err(|_| KeyError::InvalidKey)?;

    let part2_scalar =
        Scalar::from_be_bytes(part2.secret_bytes()).map_err(|_| KeyError::InvalidKey)?;
    part1.add_tweak(&part2_scalar).map_err(|_| KeyError::InvalidKey)
}
