//! Proving and verifying the value under a single key.

use crate::compact::make_single_key_hash;
use crate::error::{DecompressError, TrieError};
use crate::hasher::NodeHasher;
use crate::key_path::{descend_path, key_to_path, path_bit, shared_prefix_len};
use crate::store::{fetch_node, NodeStore};
use crate::trie::{InternalData, KeyPath, Node, NodeData, Value};
use crate::zero_hash::MAX_DEPTH;

use alloc::vec::Vec;

/// A proof of the value under some key: the siblings of every node on the key's path, from the
/// root's child (depth 1) down to the leaf level (depth 256).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct PathProof {
    /// Sibling nodes encountered during lookup, in ascending order by depth.
    pub siblings: Vec<Node>,
}

impl PathProof {
    /// Verify this proof of `value` under `key` against `root`.
    ///
    /// Proving the zero value proves the key absent.
    pub fn verify<H: NodeHasher>(&self, root: Node, key: &KeyPath, value: Value) -> bool {
        verify_proof::<H>(&self.siblings, root, key, value)
    }

    /// Compress this proof, eliding siblings which are empty subtrees.
    pub fn compress<H: NodeHasher>(&self) -> Vec<u8> {
        super::compress::<H>(&self.siblings)
    }

    /// Restore a proof from its compressed form.
    pub fn decompress<H: NodeHasher>(bytes: &[u8]) -> Result<Self, DecompressError> {
        super::decompress::<H>(bytes).map(|siblings| PathProof { siblings })
    }
}

/// Record the siblings along the path to `key`.
///
/// This works over the stores of both engines. Empty subtrees contribute the empty roots below
/// them. A single-leaf node is expanded without further reads: its siblings are empty, except at
/// the depth where `key` leaves the stored leaf's path, where the sibling is the root of the
/// stored leaf's own single-leaf subtree. The resulting proof of the zero value shows the key is
/// absent.
pub fn make_merkle_proof<H: NodeHasher>(
    store: &impl NodeStore,
    root: Node,
    key: &KeyPath,
) -> Result<PathProof, TrieError> {
    let zero_hashes = H::zero_hashes();
    let path = key_to_path(key);
    let mut siblings = Vec::with_capacity(MAX_DEPTH);

    let mut node = root;
    while siblings.len() < MAX_DEPTH {
        let depth = siblings.len();
        if zero_hashes.is_empty_subtree(depth, &node) {
            break;
        }
        match fetch_node(store, &node, depth)? {
            NodeData::Internal(data) => {
                let bit = path_bit(&path, depth);
                siblings.push(data.sibling(bit));
                node = data.child(bit);
            }
            NodeData::SingleLeaf(leaf) => {
                let leaf_path = key_to_path(&leaf.path);
                let shared = shared_prefix_len(&descend_path(&path, depth), &leaf_path);
                let split = depth + shared;
                siblings.extend((depth..split.min(MAX_DEPTH)).map(|d| zero_hashes[d + 1]));
                if split < MAX_DEPTH {
                    let below = descend_path(&leaf_path, shared + 1);
                    siblings.push(make_single_key_hash::<H>(&below, split + 1, &leaf.value));
                }
                break;
            }
        }
    }

    let depth = siblings.len();
    siblings.extend((depth..MAX_DEPTH).map(|d| zero_hashes[d + 1]));
    Ok(PathProof { siblings })
}

/// Check that `proof` shows `value` under `key` in the trie with the given root.
///
/// The value is hashed up from the leaf level against the siblings, deepest first. Proofs which
/// do not carry exactly 256 siblings are rejected.
pub fn verify_proof<H: NodeHasher>(
    proof: &[Node],
    root: Node,
    key: &KeyPath,
    value: Value,
) -> bool {
    if proof.len() != MAX_DEPTH {
        return false;
    }

    let mut path = key_to_path(key);
    let mut node = value;
    for sibling in proof.iter().rev() {
        let data = InternalData::from_child_and_sibling(path.bit(0), node, *sibling);
        node = H::hash_internal(&data);
        path >>= 1usize;
    }
    node == root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Blake3Hasher;
    use crate::store::tests::TestStore;
    use crate::trie::ZERO_VALUE;
    use crate::{compact, eager};

    fn key(last: u8) -> KeyPath {
        let mut key = [0u8; 32];
        key[31] = last;
        key
    }

    #[test]
    fn proof_of_single_update() {
        let store = TestStore::default();
        let root = eager::new_tree::<Blake3Hasher>(&store);
        let root = eager::update::<Blake3Hasher>(&store, root, &key(1), [0x11; 32]).unwrap();

        let proof = make_merkle_proof::<Blake3Hasher>(&store, root, &key(1)).unwrap();
        assert_eq!(proof.siblings.len(), MAX_DEPTH);
        assert!(proof.verify::<Blake3Hasher>(root, &key(1), [0x11; 32]));
        assert!(!proof.verify::<Blake3Hasher>(root, &key(1), [0x12; 32]));
        assert!(!proof.verify::<Blake3Hasher>(root, &key(3), [0x11; 32]));
    }

    #[test]
    fn eager_and_compact_proofs_agree() {
        let eager_store = TestStore::default();
        let compact_store = TestStore::default();
        let mut eager_root = eager::new_tree::<Blake3Hasher>(&eager_store);
        let mut compact_root = compact::new_tree::<Blake3Hasher>();

        let keys = [key(1), key(2), key(0x80), [0xFF; 32], [0x0F; 32]];
        for (i, k) in keys.iter().enumerate() {
            let value = [i as u8 + 1; 32];
            eager_root = eager::update::<Blake3Hasher>(&eager_store, eager_root, k, value).unwrap();
            compact_root =
                compact::update::<Blake3Hasher>(&compact_store, compact_root, k, value).unwrap();
        }

        for (i, k) in keys.iter().enumerate().chain([(9, &key(3))]) {
            let from_eager =
                make_merkle_proof::<Blake3Hasher>(&eager_store, eager_root, k).unwrap();
            let from_compact =
                make_merkle_proof::<Blake3Hasher>(&compact_store, compact_root, k).unwrap();
            assert_eq!(from_eager, from_compact);

            let value = if i < keys.len() {
                [i as u8 + 1; 32]
            } else {
                ZERO_VALUE
            };
            assert!(from_compact.verify::<Blake3Hasher>(compact_root, k, value));
        }
    }

    #[test]
    fn absent_key_below_single_leaf() {
        let store = TestStore::default();
        let root = compact::new_tree::<Blake3Hasher>();
        let root = compact::update::<Blake3Hasher>(&store, root, &key(1), [1; 32]).unwrap();

        let proof = make_merkle_proof::<Blake3Hasher>(&store, root, &key(2)).unwrap();
        assert!(proof.verify::<Blake3Hasher>(root, &key(2), ZERO_VALUE));
        assert!(!proof.verify::<Blake3Hasher>(root, &key(2), [1; 32]));
    }

    #[test]
    fn empty_tree_proof_is_all_zero_hashes() {
        let store = TestStore::default();
        let root = compact::new_tree::<Blake3Hasher>();
        let proof = make_merkle_proof::<Blake3Hasher>(&store, root, &[0xAA; 32]).unwrap();
        let zero_hashes = Blake3Hasher::zero_hashes();
        for (i, sibling) in proof.siblings.iter().enumerate() {
            assert_eq!(sibling, &zero_hashes[i + 1]);
        }
        assert!(proof.verify::<Blake3Hasher>(root, &[0xAA; 32], ZERO_VALUE));
    }

    #[test]
    fn tampered_proofs_are_rejected() {
        let store = TestStore::default();
        let mut root = compact::new_tree::<Blake3Hasher>();
        for i in 1..=8u8 {
            root = compact::update::<Blake3Hasher>(&store, root, &key(i), [i; 32]).unwrap();
        }
        let proof = make_merkle_proof::<Blake3Hasher>(&store, root, &key(5)).unwrap();
        assert!(proof.verify::<Blake3Hasher>(root, &key(5), [5; 32]));

        for depth in [0, 128, 250, 253, 255] {
            for byte in [0, 31] {
                let mut tampered = proof.clone();
                tampered.siblings[depth][byte] ^= 0x01;
                assert!(!tampered.verify::<Blake3Hasher>(root, &key(5), [5; 32]));
            }
        }

        let mut short = proof.clone();
        short.siblings.pop();
        assert!(!short.verify::<Blake3Hasher>(root, &key(5), [5; 32]));
    }
}
