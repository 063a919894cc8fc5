//! The compact engine: empty and single-leaf subtrees are elided.
//!
//! Every digest met while walking a compact trie is one of:
//!   - the zero hash for its depth: an empty subtree, never stored;
//!   - a single-leaf node: a subtree with exactly one non-zero leaf, stored once under the root
//!     digest the fully materialized subtree would have;
//!   - an internal node: a subtree with at least two non-zero leaves.
//!
//! Digests are identical to the ones the eager engine computes for the same set of leaves, so
//! proofs verify the same way against either.
//!
//! All walks are iterative. Nodes are hashed from the innermost level outward, and sibling stacks
//! are bounded by the 256 levels of the trie.

use crate::eager::Sidenodes;
use crate::error::TrieError;
use crate::hasher::NodeHasher;
use crate::key_path::{
    descend_path, key_to_path, lift_path, next_bit, path_bit, path_to_key, remaining_path,
    shared_prefix_len, Path,
};
use crate::store::{fetch_node, write_node, NodeStore};
use crate::trie::{InternalData, KeyPath, LeafData, Node, NodeData, Value, ZERO_VALUE};
use crate::zero_hash::MAX_DEPTH;

/// The root of an empty compact trie. Nothing needs to be written.
pub fn new_tree<H: NodeHasher>() -> Node {
    H::zero_hashes().root()
}

/// Read the value stored under `key`.
///
/// Empty subtrees and single-leaf nodes both end the walk early.
pub fn get<H: NodeHasher>(
    store: &impl NodeStore,
    root: Node,
    key: &KeyPath,
) -> Result<Value, TrieError> {
    let zero_hashes = H::zero_hashes();
    let mut node = root;
    let mut path = key_to_path(key);
    for depth in 0..MAX_DEPTH {
        if zero_hashes.is_empty_subtree(depth, &node) {
            return Ok(ZERO_VALUE);
        }
        match fetch_node(store, &node, depth)? {
            NodeData::SingleLeaf(leaf) => {
                return Ok(if key_to_path(&leaf.path) == path {
                    leaf.value
                } else {
                    ZERO_VALUE
                });
            }
            NodeData::Internal(data) => node = data.child(next_bit(&path)),
        }
        path <<= 1usize;
    }
    Ok(node)
}

/// Compute the root of a subtree at `depth` holding a single leaf, without touching the store.
///
/// `path` is the leaf's path below `depth`, left-aligned.
pub fn make_single_key_hash<H: NodeHasher>(path: &Path, depth: usize, value: &Value) -> Node {
    let zero_hashes = H::zero_hashes();
    if depth >= MAX_DEPTH {
        return *value;
    }
    if *value == ZERO_VALUE {
        return zero_hashes[depth];
    }

    let mut node = *value;
    for d in (depth..MAX_DEPTH).rev() {
        let bit = path_bit(path, d - depth);
        let data = InternalData::from_child_and_sibling(bit, node, zero_hashes[d + 1]);
        node = H::hash_internal(&data);
    }
    node
}

/// Build the subtree at `depth` holding exactly two leaves, writing every node it needs, and
/// return its root.
///
/// Above the depth where the paths diverge, one internal node per level pairs the shared branch
/// with an empty sibling. At the divergence, each leaf becomes a single-leaf node.
///
/// Fails with [`TrieError::OverfullSubtree`] if the paths never diverge: two leaves cannot share
/// the terminal slot.
pub fn make_double_key_hash<H: NodeHasher>(
    store: &impl NodeStore,
    path1: &Path,
    path2: &Path,
    depth: usize,
    value1: &Value,
    value2: &Value,
) -> Result<Node, TrieError> {
    let shared = shared_prefix_len(path1, path2);
    let split = depth + shared;
    if split >= MAX_DEPTH {
        return Err(TrieError::OverfullSubtree { depth });
    }

    let zero_hashes = H::zero_hashes();

    let leaf1 = write_single_leaf::<H>(store, &descend_path(path1, shared + 1), split + 1, value1);
    let leaf2 = write_single_leaf::<H>(store, &descend_path(path2, shared + 1), split + 1, value2);
    let data = InternalData::from_child_and_sibling(path_bit(path1, shared), leaf1, leaf2);
    let mut node = write_internal::<H>(store, data);

    for d in (depth..split).rev() {
        let bit = path_bit(path1, d - depth);
        let data = InternalData::from_child_and_sibling(bit, node, zero_hashes[d + 1]);
        node = write_internal::<H>(store, data);
    }

    Ok(node)
}

/// The shape of a freshly updated subtree, carried upward while re-hashing.
#[derive(Clone, Copy)]
enum Subtree {
    Empty,
    Leaf { path: Path, value: Value },
    Branch,
}

// where the descent towards a key stopped.
enum Terminal {
    Empty,
    SingleLeaf(LeafData),
    // a full 256 level descent through internal nodes. the node is the old leaf value.
    Slot,
}

/// Set the value under `key`, returning the new root.
///
/// Writing the zero value removes the key. Subtrees left with a single leaf are collapsed back
/// into single-leaf nodes on the way up, so the result has the same shape, and the same root, as
/// a trie built from scratch with the remaining leaves.
pub fn update<H: NodeHasher>(
    store: &impl NodeStore,
    root: Node,
    key: &KeyPath,
    value: Value,
) -> Result<Node, TrieError> {
    let zero_hashes = H::zero_hashes();
    let path = key_to_path(key);

    let mut sidenodes = Sidenodes::new();
    let mut node = root;
    let terminal = loop {
        let depth = sidenodes.len();
        if depth == MAX_DEPTH {
            break Terminal::Slot;
        }
        if zero_hashes.is_empty_subtree(depth, &node) {
            break Terminal::Empty;
        }
        match fetch_node(store, &node, depth)? {
            NodeData::SingleLeaf(leaf) => break Terminal::SingleLeaf(leaf),
            NodeData::Internal(data) => {
                let bit = path_bit(&path, depth);
                sidenodes.push(data.sibling(bit));
                node = data.child(bit);
            }
        }
    };

    let depth = sidenodes.len();
    let remaining = remaining_path(key, depth);
    let (mut node, mut subtree) = match terminal {
        Terminal::Empty if value == ZERO_VALUE => return Ok(root),
        Terminal::Empty | Terminal::Slot => replace_subtree::<H>(store, &remaining, depth, value),
        Terminal::SingleLeaf(leaf) => {
            let existing = key_to_path(&leaf.path);
            if existing == remaining {
                replace_subtree::<H>(store, &remaining, depth, value)
            } else if value == ZERO_VALUE {
                return Ok(root);
            } else {
                let node = make_double_key_hash::<H>(
                    store,
                    &remaining,
                    &existing,
                    depth,
                    &value,
                    &leaf.value,
                )?;
                (node, Subtree::Branch)
            }
        }
    };

    for d in (0..depth).rev() {
        let bit = path_bit(&path, d);
        let sibling = sidenodes[d];
        let sibling_empty = zero_hashes.is_empty_subtree(d + 1, &sibling);

        let sibling_leaf = match subtree {
            Subtree::Empty if !sibling_empty => sibling_as_leaf(store, &sibling, d + 1)?,
            _ => None,
        };

        let data = InternalData::from_child_and_sibling(bit, node, sibling);
        (node, subtree) = match (subtree, sibling_leaf) {
            (Subtree::Empty, _) if sibling_empty => (zero_hashes[d], Subtree::Empty),
            (Subtree::Empty, Some((leaf_path, leaf_value))) => {
                lift_leaf::<H>(store, data, lift_path(&leaf_path, !bit), leaf_value)
            }
            (
                Subtree::Leaf {
                    path: leaf_path,
                    value: leaf_value,
                },
                _,
            ) if sibling_empty => {
                lift_leaf::<H>(store, data, lift_path(&leaf_path, bit), leaf_value)
            }
            _ => (write_internal::<H>(store, data), Subtree::Branch),
        };
    }

    Ok(node)
}

/// Apply a sequence of updates, one after the other, returning the final root.
///
/// There is no atomicity across keys: on failure, nodes of the updates which completed remain in
/// the store.
pub fn multi_update<H: NodeHasher>(
    store: &impl NodeStore,
    root: Node,
    ops: impl IntoIterator<Item = (KeyPath, Value)>,
) -> Result<Node, TrieError> {
    ops.into_iter()
        .try_fold(root, |root, (key, value)| update::<H>(store, root, &key, value))
}

// replace a whole subtree with one holding only the given leaf, or nothing for a zero value.
fn replace_subtree<H: NodeHasher>(
    store: &impl NodeStore,
    path: &Path,
    depth: usize,
    value: Value,
) -> (Node, Subtree) {
    if value == ZERO_VALUE {
        return (H::zero_hashes()[depth], Subtree::Empty);
    }
    let node = write_single_leaf::<H>(store, path, depth, &value);
    (
        node,
        Subtree::Leaf {
            path: *path,
            value,
        },
    )
}

// resolve a non-empty sibling at `depth` to its single leaf, if it has exactly one.
fn sibling_as_leaf(
    store: &impl NodeStore,
    sibling: &Node,
    depth: usize,
) -> Result<Option<(Path, Value)>, TrieError> {
    if depth == MAX_DEPTH {
        return Ok(Some((Path::ZERO, *sibling)));
    }
    Ok(match fetch_node(store, sibling, depth)? {
        NodeData::SingleLeaf(leaf) => Some((key_to_path(&leaf.path), leaf.value)),
        NodeData::Internal(_) => None,
    })
}

// the parent of a single-leaf subtree and an empty one is itself a single-leaf subtree.
fn lift_leaf<H: NodeHasher>(
    store: &impl NodeStore,
    data: InternalData,
    path: Path,
    value: Value,
) -> (Node, Subtree) {
    let node = H::hash_internal(&data);
    let leaf = LeafData {
        path: path_to_key(path),
        value,
    };
    write_node(store, node, &NodeData::SingleLeaf(leaf));
    (node, Subtree::Leaf { path, value })
}

fn write_single_leaf<H: NodeHasher>(
    store: &impl NodeStore,
    path: &Path,
    depth: usize,
    value: &Value,
) -> Node {
    let node = make_single_key_hash::<H>(path, depth, value);
    // leaf values and empty subtrees are never looked up.
    if depth < MAX_DEPTH && *value != ZERO_VALUE {
        let leaf = LeafData {
            path: path_to_key(*path),
            value: *value,
        };
        write_node(store, node, &NodeData::SingleLeaf(leaf));
    }
    node
}

fn write_internal<H: NodeHasher>(store: &impl NodeStore, data: InternalData) -> Node {
    let node = H::hash_internal(&data);
    write_node(store, node, &NodeData::Internal(data));
    node
}
