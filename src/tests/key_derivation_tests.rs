// Key derivation tests against the BOLT3 Appendix E vectors.

use crate::error::KeyError;
use crate::keys::commitment::CommitmentKeys;
use crate::keys::derivation::{
    derive_per_commitment_point, derive_private_key, derive_public_key,
    derive_revocation_private_key, derive_revocation_public_key, generate_per_commitment_secret,
};
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};

fn secret(hex_str: &str) -> SecretKey {
    SecretKey::from_slice(&hex::decode(hex_str).unwrap()).unwrap()
}

fn point(hex_str: &str) -> PublicKey {
    PublicKey::from_slice(&hex::decode(hex_str).unwrap()).unwrap()
}

#[test]
fn test_derivation_of_local_public_key() {
    let secp = Secp256k1::new();

    let base_point =
        point("036d6caac248af96f6afa7f904f550253a0f3ef3f5aa2fe6838a95b216691468e2");
    let per_commitment_point =
        point("025f7117a78150fe2ef97db7cfc83bd57b2e2c0d0dd25eaf467a4a1c2a45ce1486");
    let expected_localpubkey =
        point("0235f2dbfaa89b57ec7b055afe29849ef7ddfeb1cefdb9ebdc43f5494984db29e5");

    let actual_local_pubkey =
        derive_public_key(&base_point, &per_commitment_point, &secp).unwrap();

    assert_eq!(
        actual_local_pubkey, expected_localpubkey,
        "Local public keys do not match"
    );
}

#[test]
fn test_derivation_of_local_private_key() {
    let secp = Secp256k1::new();

    let basepoint_secret =
        secret("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
    let per_commitment_point =
        point("025f7117a78150fe2ef97db7cfc83bd57b2e2c0d0dd25eaf467a4a1c2a45ce1486");
    let expected_localprivkey =
        secret("cbced912d3b21bf196a766651e436aff192362621ce317704ea2f75d87e7be0f");

    let actual_local_privkey =
        derive_private_key(&basepoint_secret, &per_commitment_point, &secp).unwrap();

    assert_eq!(
        expected_localprivkey, actual_local_privkey,
        "Local private keys do not match"
    );
}

#[test]
fn test_derivation_of_revocation_pubkey() {
    let secp = Secp256k1::new();

    let revocation_basepoint =
        point("036d6caac248af96f6afa7f904f550253a0f3ef3f5aa2fe6838a95b216691468e2");
    let per_commitment_point =
        point("025f7117a78150fe2ef97db7cfc83bd57b2e2c0d0dd25eaf467a4a1c2a45ce1486");
    let expected_revocation_pubkey =
        point("02916e326636d19c33f13e8c0c3a03dd157f332f3e99c317c141dd865eb01f8ff0");

    let actual_revocation_pubkey =
        derive_revocation_public_key(&revocation_basepoint, &per_commitment_point, &secp).unwrap();

    assert_eq!(
        expected_revocation_pubkey, actual_revocation_pubkey,
        "Revocation public keys do not match"
    );
}

#[test]
fn test_derivation_of_revocation_privkey() {
    let secp = Secp256k1::new();

    let revocation_basepoint_secret =
        secret("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
    let per_commitment_secret =
        secret("1f1e1d1c1b1a191817161514131211100f0e0d0c0b0a09080706050403020100");
    let expected_revocation_privkey =
        secret("d09ffff62ddb2297ab000cc85bcb4283fdeb6aa052affbc9dddcf33b61078110");

    let actual_revocation_privkey = derive_revocation_private_key(
        &revocation_basepoint_secret,
        &per_commitment_secret,
        &secp,
    )
    .unwrap();

    assert_eq!(
        expected_revocation_privkey, actual_revocation_privkey,
        "Revocation private keys do not match"
    );
}

#[test]
fn test_per_commitment_secret_generation() {
    // (seed, index, expected secret)
    let vectors = [
        (
            [0x00u8; 32],
            281474976710655u64,
            "02a40c85b6f28da08dfdbe0926c53fab2de6d28c10301f8f7c4073d5e42e3148",
        ),
        (
            [0xFFu8; 32],
            281474976710655u64,
            "7cc854b54e3e0dcdb010d7a3fee464a9687be6e8db3be6854c475621e007a5dc",
        ),
        (
            [0xFFu8; 32],
            0xaaaaaaaaaaau64,
            "56f4008fb007ca9acf0e15b054d5c9fd12ee06cea347914ddbaed70d1c13a528",
        ),
        (
            [0xFFu8; 32],
            0x555555555555u64,
            "9015daaeb06dba4ccc05b91b2f73bd54405f2be9f217fbacd3c5ac2e62327d31",
        ),
        (
            [0x01u8; 32],
            1u64,
            "915c75942a26bb3a433a8ce2cb0427c29ec6c1775cfc78328b57f6ba7bfeaa9c",
        ),
    ];

    for (seed, idx, expected) in vectors {
        let actual = generate_per_commitment_secret(&seed, idx).unwrap();
        assert_eq!(hex::encode(actual), expected, "secret mismatch at index {}", idx);
    }
}

#[test]
fn test_per_commitment_secret_index_out_of_range() {
    let seed = [0x01u8; 32];
    assert_eq!(
        generate_per_commitment_secret(&seed, 1 << 48),
        Err(KeyError::IndexOutOfRange(1 << 48)),
    );
}

#[test]
fn test_per_commitment_point_matches_secret() {
    let secp = Secp256k1::new();
    let seed = [0x0fu8; 32];
    let idx = 281474976710655u64 - 42;

    let secret_bytes = generate_per_commitment_secret(&seed, idx).unwrap();
    let secret_key = SecretKey::from_slice(&secret_bytes).unwrap();
    let expected_point = PublicKey::from_secret_key(&secp, &secret_key);

    let actual_point = derive_per_commitment_point(&seed, idx, &secp).unwrap();
    assert_eq!(expected_point, actual_point);
}

#[test]
fn test_derived_keys_are_consistent_public_private() {
    // Any derived private key must be the discrete log of the corresponding
    // derived public key.
    let secp = Secp256k1::new();
    let base_secret = secret("1111111111111111111111111111111111111111111111111111111111111111");
    let basepoint = PublicKey::from_secret_key(&secp, &base_secret);
    let per_commitment_secret =
        secret("2222222222222222222222222222222222222222222222222222222222222222");
    let per_commitment_point = PublicKey::from_secret_key(&secp, &per_commitment_secret);

    let derived_pub = derive_public_key(&basepoint, &per_commitment_point, &secp).unwrap();
    let derived_priv = derive_private_key(&base_secret, &per_commitment_point, &secp).unwrap();
    assert_eq!(derived_pub, PublicKey::from_secret_key(&secp, &derived_priv));

    let derived_rev_pub =
        derive_revocation_public_key(&basepoint, &per_commitment_point, &secp).unwrap();
    let derived_rev_priv =
        derive_revocation_private_key(&base_secret, &per_commitment_secret, &secp).unwrap();
    assert_eq!(
        derived_rev_pub,
        PublicKey::from_secret_key(&secp, &derived_rev_priv)
    );
}

#[test]
fn test_commitment_keys_from_basepoints() {
    let secp = Secp256k1::new();
    let per_commitment_point =
        point("025f7117a78150fe2ef97db7cfc83bd57b2e2c0d0dd25eaf467a4a1c2a45ce1486");
    let delayed_basepoint =
        point("036d6caac248af96f6afa7f904f550253a0f3ef3f5aa2fe6838a95b216691468e2");
    let htlc_basepoint =
        point("034f355bdcb7cc0af728ef3cceb9615d90684bb5b2ca5f859ab0f0b704075871aa");
    let remote_revocation_basepoint =
        point("036d6caac248af96f6afa7f904f550253a0f3ef3f5aa2fe6838a95b216691468e2");
    let remote_htlc_basepoint =
        point("032c0b7cf95324a07d05398b240174dc0c2be444d96b159aa6c7f7b1e668680991");

    let keys = CommitmentKeys::from_basepoints(
        &per_commitment_point,
        &delayed_basepoint,
        &htlc_basepoint,
        &remote_revocation_basepoint,
        &remote_htlc_basepoint,
        &secp,
    )
    .unwrap();

    assert_eq!(keys.per_commitment_point, per_commitment_point);
    assert_eq!(
        keys.revocation_key,
        derive_revocation_public_key(&remote_revocation_basepoint, &per_commitment_point, &secp)
            .unwrap()
    );
    assert_eq!(
        keys.local_delayed_payment_key,
        derive_public_key(&delayed_basepoint, &per_commitment_point, &secp).unwrap()
    );
    assert_eq!(
        keys.local_htlc_key,
        derive_public_key(&htlc_basepoint, &per_commitment_point, &secp).unwrap()
    );
    assert_eq!(
        keys.remote_htlc_key,
        derive_public_key(&remote_htlc_basepoint, &per_commitment_point, &secp).unwrap()
    );
}
