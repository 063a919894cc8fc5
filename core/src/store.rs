//! The content-addressed node store the engines read from and write to.

use crate::error::TrieError;
use crate::trie::{Node, NodeData};

use alloc::{sync::Arc, vec::Vec};

/// A mapping from node digests to encoded nodes.
///
/// The store has no knowledge of the trie's structure and performs no validation that the bytes
/// hash to their key; the engines maintain that invariant. Entries are never mutated by the
/// engines, only added, so every root ever returned stays readable.
///
/// Receivers are shared so that a store may serve readers of older roots while a writer computes
/// a new one. Implementations which allow that must make `get` and `put` individually atomic.
pub trait NodeStore {
    /// Fetch the bytes stored under a digest.
    fn get(&self, node: &Node) -> Option<Vec<u8>>;

    /// Store bytes under a digest. Writing the same pair twice must have the effect of writing
    /// it once.
    fn put(&self, node: Node, bytes: Vec<u8>);

    /// Remove the entry for a digest. The engines never call this.
    fn delete(&self, node: &Node);
}

impl<S: NodeStore + ?Sized> NodeStore for &S {
    fn get(&self, node: &Node) -> Option<Vec<u8>> {
        (**self).get(node)
    }

    fn put(&self, node: Node, bytes: Vec<u8>) {
        (**self).put(node, bytes)
    }

    fn delete(&self, node: &Node) {
        (**self).delete(node)
    }
}

impl<S: NodeStore + ?Sized> NodeStore for Arc<S> {
    fn get(&self, node: &Node) -> Option<Vec<u8>> {
        (**self).get(node)
    }

    fn put(&self, node: Node, bytes: Vec<u8>) {
        (**self).put(node, bytes)
    }

    fn delete(&self, node: &Node) {
        (**self).delete(node)
    }
}

/// Fetch and decode the node stored under `node`, expected at `depth`.
pub fn fetch_node(
    store: &impl NodeStore,
    node: &Node,
    depth: usize,
) -> Result<NodeData, TrieError> {
    let bytes = store
        .get(node)
        .ok_or(TrieError::MissingNode { node: *node, depth })?;
    NodeData::decode(node, &bytes)
}

/// Encode and store a node under its digest.
pub fn write_node(store: &impl NodeStore, node: Node, data: &NodeData) {
    store.put(node, data.encode());
}
