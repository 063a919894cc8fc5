mod common;

use bintrie::{
    Blake3Hasher, DecompressError, KeccakTrie, KeyPath, Node, NodeHasher as _, Options, PathProof,
    Strategy, Trie, Value, ZERO_VALUE,
};
use common::{key_path, small_key, trie, value};
use hex_literal::hex;

fn verify(proof: &PathProof, root: Node, key: &KeyPath, value: Value) -> bool {
    Trie::<Blake3Hasher>::verify(proof, root, key, value)
}

fn verify_compressed(bytes: &[u8], root: Node, key: &KeyPath, value: Value) -> bool {
    let verified = Trie::<Blake3Hasher>::verify_compressed(bytes, root, key, value);
    verified.unwrap()
}

#[test]
fn proofs_verify_for_both_strategies() {
    for strategy in [Strategy::Eager, Strategy::Compact] {
        let mut t = trie(strategy);
        for id in 0..50 {
            t.update(key_path(id), value(id)).unwrap();
        }
        let root = t.root();

        for id in 0..50 {
            let key = key_path(id);
            let proof = t.prove(&key).unwrap();
            assert_eq!(proof.siblings.len(), 256);
            assert!(verify(&proof, root, &key, value(id)));
            assert!(!verify(&proof, root, &key, value(id + 1)));
            assert!(!verify(&proof, root, &key, ZERO_VALUE));
        }
    }
}

#[test]
fn strategies_produce_identical_proofs() {
    let mut eager = trie(Strategy::Eager);
    let mut compact = trie(Strategy::Compact);
    for id in 0..30 {
        eager.update(key_path(id), value(id)).unwrap();
        compact.update(key_path(id), value(id)).unwrap();
    }

    for id in 0..40 {
        assert_eq!(
            eager.prove(&key_path(id)).unwrap(),
            compact.prove(&key_path(id)).unwrap()
        );
    }
}

#[test]
fn absent_keys_prove_zero() {
    for strategy in [Strategy::Eager, Strategy::Compact] {
        let mut t = trie(strategy);
        for id in 0..10 {
            t.update(key_path(id), value(id)).unwrap();
        }
        let root = t.root();

        for id in 100..110 {
            let key = key_path(id);
            let proof = t.prove(&key).unwrap();
            assert!(verify(&proof, root, &key, ZERO_VALUE));
            assert!(!verify(&proof, root, &key, value(id)));
        }
    }
}

#[test]
fn empty_trie_proof() {
    let t = trie(Strategy::Compact);
    let key = small_key(3);
    let proof = t.prove(&key).unwrap();
    let zero_hashes = Blake3Hasher::zero_hashes();
    for (i, sibling) in proof.siblings.iter().enumerate() {
        assert_eq!(*sibling, zero_hashes[i + 1]);
    }
    assert!(verify(&proof, t.root(), &key, ZERO_VALUE));
    assert_eq!(t.prove_compressed(&key).unwrap(), vec![0xFF; 32]);
}

#[test]
fn proofs_against_stale_roots_fail() {
    let mut t = trie(Strategy::Compact);
    let key = key_path(1);
    t.update(key, value(1)).unwrap();
    let old_root = t.root();
    let proof = t.prove(&key).unwrap();

    t.update(key_path(2), value(2)).unwrap();
    assert!(!verify(&proof, t.root(), &key, value(1)));
    assert!(verify(&proof, old_root, &key, value(1)));
}

#[test]
fn tampered_or_short_proofs_are_rejected() {
    let mut t = trie(Strategy::Eager);
    for id in 0..5 {
        t.update(key_path(id), value(id)).unwrap();
    }
    let root = t.root();
    let key = key_path(0);
    let proof = t.prove(&key).unwrap();

    for index in [0, 17, 128, 255] {
        let mut tampered = proof.clone();
        tampered.siblings[index][0] ^= 1;
        assert!(!verify(&tampered, root, &key, value(0)));
    }

    let mut short = proof.clone();
    short.siblings.pop();
    assert!(!verify(&short, root, &key, value(0)));

    let mut long = proof;
    long.siblings.push([0; 32]);
    assert!(!verify(&long, root, &key, value(0)));
}

#[test]
fn compressed_proofs_roundtrip_and_verify() {
    for strategy in [Strategy::Eager, Strategy::Compact] {
        let mut t = trie(strategy);
        for id in 0..64 {
            t.update(key_path(id), value(id)).unwrap();
        }
        let root = t.root();

        for id in 0..64 {
            let key = key_path(id);
            let compressed = t.prove_compressed(&key).unwrap();
            // a bitmap plus a handful of siblings near the root.
            assert!(compressed.len() < 32 + 24 * 32);
            assert_eq!((compressed.len() - 32) % 32, 0);

            let proof = PathProof::decompress::<Blake3Hasher>(&compressed).unwrap();
            assert_eq!(proof, t.prove(&key).unwrap());
            assert!(verify_compressed(&compressed, root, &key, value(id)));
            assert!(!verify_compressed(&compressed, root, &key, value(id + 1)));
        }
    }
}

#[test]
fn malformed_compressed_proofs_are_errors() {
    let key = small_key(1);
    let root = Blake3Hasher::zero_hashes().root();
    let decompress_error = |bytes: &[u8]| {
        let result = Trie::<Blake3Hasher>::verify_compressed(bytes, root, &key, ZERO_VALUE);
        result.unwrap_err().downcast::<DecompressError>().unwrap()
    };

    assert_eq!(
        decompress_error(&[0xFF; 31]),
        DecompressError::MissingBitmap { len: 31 }
    );

    // one sibling declared, none carried.
    let mut bytes = vec![0xFF; 32];
    bytes[0] = 0xFE;
    assert_eq!(
        decompress_error(&bytes),
        DecompressError::Truncated {
            expected: 1,
            actual: 0
        }
    );

    let mut bytes = vec![0xFF; 32];
    bytes.push(0);
    assert_eq!(
        decompress_error(&bytes),
        DecompressError::TrailingBytes { extra: 1 }
    );
}

#[test]
fn keccak_trie_roots_and_proofs() {
    let mut options = Options::new();
    options.strategy(Strategy::Compact);
    let mut t: KeccakTrie = KeccakTrie::new(options);
    assert_eq!(
        t.root(),
        hex!("a7ff9e28ffd3def443d324547688c2c4eb98edf7da757d6bfa22bff55b9ce24a")
    );

    t.update(small_key(1), [0x11; 32]).unwrap();
    t.update(small_key(2), [0x22; 32]).unwrap();
    t.update(small_key(1), ZERO_VALUE).unwrap();

    // only the second key is left.
    let root = t.root();
    assert_eq!(
        root,
        hex!("81dd030bf3ee519f660e7bfd0a5b894df63e7a86c6a552409de162fa8eb4f6d7")
    );

    let (present, absent) = (small_key(2), small_key(1));
    let proof = t.prove(&present).unwrap();
    assert!(<KeccakTrie>::verify(&proof, root, &present, [0x22; 32]));
    let proof = t.prove(&absent).unwrap();
    assert!(<KeccakTrie>::verify(&proof, root, &absent, ZERO_VALUE));
}
