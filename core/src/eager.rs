//! The eager engine: every one of the 256 levels is materialized in the store.
//!
//! An empty trie is realized physically as one internal node per depth, each being two copies of
//! the empty root of the depth below, so that lookups always resolve through stored nodes. An
//! update writes a fresh node at every depth along the key's path and never removes the nodes it
//! supersedes.

use crate::error::TrieError;
use crate::hasher::NodeHasher;
use crate::key_path::{key_to_path, next_bit, Path};
use crate::store::{fetch_node, write_node, NodeStore};
use crate::trie::{InternalData, KeyPath, Node, NodeData, Value};
use crate::zero_hash::MAX_DEPTH;

use arrayvec::ArrayVec;
use bitvec::prelude::*;

/// Sibling nodes along a full path, ordered from the root's children down to the leaf level.
pub type Sidenodes = ArrayVec<Node, MAX_DEPTH>;

/// Write an empty trie into the store and return its root.
///
/// The root equals the empty root of the zero-hash table.
pub fn new_tree<H: NodeHasher>(store: &impl NodeStore) -> Node {
    let zero_hashes = H::zero_hashes();
    for depth in (0..MAX_DEPTH).rev() {
        let below = zero_hashes[depth + 1];
        let data = NodeData::Internal(InternalData {
            left: below,
            right: below,
        });
        write_node(store, zero_hashes[depth], &data);
    }
    zero_hashes.root()
}

/// Read the value stored under `key`.
pub fn get(store: &impl NodeStore, root: Node, key: &KeyPath) -> Result<Value, TrieError> {
    let mut node = root;
    let mut path = key_to_path(key);
    for depth in 0..MAX_DEPTH {
        let data = fetch_internal(store, &node, depth)?;
        node = data.child(next_bit(&path));
        path <<= 1usize;
    }
    Ok(node)
}

/// Follow `path` down from `root` and return the digest reached.
///
/// The path may be any prefix of a key, up to all 256 bits.
pub fn descend(
    store: &impl NodeStore,
    root: Node,
    path: &BitSlice<u8, Msb0>,
) -> Result<Node, TrieError> {
    let mut node = root;
    for (depth, bit) in path.iter().by_vals().take(MAX_DEPTH).enumerate() {
        node = fetch_internal(store, &node, depth)?.child(bit);
    }
    Ok(node)
}

/// Record the siblings of every node on the path to `key`.
pub fn sidenodes(
    store: &impl NodeStore,
    root: Node,
    key: &KeyPath,
) -> Result<Sidenodes, TrieError> {
    let mut sidenodes = Sidenodes::new();
    let mut node = root;
    let mut path = key_to_path(key);
    for depth in 0..MAX_DEPTH {
        let data = fetch_internal(store, &node, depth)?;
        let bit = next_bit(&path);
        sidenodes.push(data.sibling(bit));
        node = data.child(bit);
        path <<= 1usize;
    }
    Ok(sidenodes)
}

/// Set the value under `key`, returning the new root.
///
/// The first pass records the siblings along the path. The second hashes the new value up to the
/// root against them, writing every new node.
pub fn update<H: NodeHasher>(
    store: &impl NodeStore,
    root: Node,
    key: &KeyPath,
    value: Value,
) -> Result<Node, TrieError> {
    let sidenodes = sidenodes(store, root, key)?;
    let mut path: Path = key_to_path(key);
    let mut node = value;
    for sibling in sidenodes.iter().rev() {
        let data = InternalData::from_child_and_sibling(path.bit(0), node, *sibling);
        node = H::hash_internal(&data);
        write_node(store, node, &NodeData::Internal(data));
        path >>= 1usize;
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

fn fetch_internal(
    store: &impl NodeStore,
    node: &Node,
    depth: usize,
) -> Result<InternalData, TrieError> {
    match fetch_node(store, node, depth)? {
        NodeData::Internal(data) => Ok(data),
        NodeData::SingleLeaf(_) => Err(TrieError::UnexpectedSingleLeaf { node: *node, depth }),
    }
}
