//! This module defines the types of a sparse binary Merkle trie, generalized over a 256 bit hash
//! function. All lookup paths in the trie are 256 bits and every leaf sits at depth 256.
//!
//! Every subtree is identified by a 256 bit digest. A digest resolves to one of three things:
//!   1. An empty subtree, when the digest equals the zero hash for its depth. Empty subtrees are
//!      never looked up in the store.
//!   2. An internal node, stored as the 64 byte concatenation of its left and right child digests.
//!      The digest of an internal node is the hash of those 64 bytes.
//!   3. A single-leaf node, stored as a flag byte, the remaining path of the only non-zero leaf
//!      below it and the value of that leaf. Its digest is the root of the subtree it stands in
//!      for, as if every level below it had been materialized.
//!
//! Single-leaf nodes are only ever written by the compact engine.

use crate::error::TrieError;

use alloc::vec::Vec;

/// A digest identifying a node. It is also the Merkle root of the subtree below that node.
pub type Node = [u8; 32];

/// The key of a value. All keys have a fixed length of 256 bits.
pub type KeyPath = [u8; 32];

/// A value stored at a leaf.
pub type Value = [u8; 32];

/// The value of a leaf which was never written.
pub const ZERO_VALUE: Value = [0u8; 32];

/// Length in bytes of an encoded internal node.
pub const INTERNAL_NODE_LEN: usize = 64;

/// Length in bytes of an encoded single-leaf node.
pub const SINGLE_LEAF_NODE_LEN: usize = 65;

/// The leading byte of an encoded single-leaf node.
pub const SINGLE_LEAF_FLAG: u8 = 0x01;

/// The data of an internal (branch) node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalData {
    /// The hash of the left child of this node.
    pub left: Node,
    /// The hash of the right child of this node.
    pub right: Node,
}

impl InternalData {
    /// Build the data of a node from a child on the path and its sibling, ordered by the
    /// path bit at the parent's depth.
    pub fn from_child_and_sibling(bit: bool, child: Node, sibling: Node) -> Self {
        if bit {
            InternalData {
                left: sibling,
                right: child,
            }
        } else {
            InternalData {
                left: child,
                right: sibling,
            }
        }
    }

    /// Get the child selected by the path bit.
    pub fn child(&self, bit: bool) -> Node {
        if bit {
            self.right
        } else {
            self.left
        }
    }

    /// Get the child not selected by the path bit.
    pub fn sibling(&self, bit: bool) -> Node {
        self.child(!bit)
    }
}

/// The data of a single-leaf node.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct LeafData {
    /// The path of the leaf below the depth of the node, left-aligned. Bits already consumed
    /// on the way down to the node have been shifted out.
    pub path: KeyPath,
    /// The value carried by the leaf.
    pub value: Value,
}

/// A decoded node, as stored under its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// A subtree holding at least two non-zero leaves.
    Internal(InternalData),
    /// A subtree holding exactly one non-zero leaf.
    SingleLeaf(LeafData),
}

impl NodeData {
    /// Encode the node in its stored form: 64 bytes for internal nodes, 65 bytes for
    /// single-leaf nodes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            NodeData::Internal(data) => {
                let mut buf = Vec::with_capacity(INTERNAL_NODE_LEN);
                buf.extend_from_slice(&data.left);
                buf.extend_from_slice(&data.right);
                buf
            }
            NodeData::SingleLeaf(leaf) => {
                let mut buf = Vec::with_capacity(SINGLE_LEAF_NODE_LEN);
                buf.push(SINGLE_LEAF_FLAG);
                buf.extend_from_slice(&leaf.path);
                buf.extend_from_slice(&leaf.value);
                buf
            }
        }
    }

    /// Decode a stored node. `node` is the digest the bytes were stored under and is only used
    /// for error reporting.
    pub fn decode(node: &Node, bytes: &[u8]) -> Result<Self, TrieError> {
        match bytes.len() {
            INTERNAL_NODE_LEN => {
                let mut left = [0u8; 32];
                let mut right = [0u8; 32];
                left.copy_from_slice(&bytes[..32]);
                right.copy_from_slice(&bytes[32..]);
                Ok(NodeData::Internal(InternalData { left, right }))
            }
            SINGLE_LEAF_NODE_LEN if bytes[0] == SINGLE_LEAF_FLAG => {
                let mut leaf = LeafData::default();
                leaf.path.copy_from_slice(&bytes[1..33]);
                leaf.value.copy_from_slice(&bytes[33..]);
                Ok(NodeData::SingleLeaf(leaf))
            }
            len => Err(TrieError::MalformedNode { node: *node, len }),
        }
    }
}
