//! Errors surfaced by the trie engines and the proof compressor.

use crate::trie::Node;

use core::fmt;

/// Errors encountered while walking or updating the trie.
///
/// None of these are retryable: every operation is a deterministic computation over the store
/// contents it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    /// A digest which must resolve to a stored node was absent from the store. The store is
    /// corrupted or the root belongs to another store.
    #[error("missing node {} at depth {depth}", Hex(.node))]
    MissingNode {
        /// The digest which could not be resolved.
        node: Node,
        /// The depth at which it was expected.
        depth: usize,
    },
    /// The bytes stored under a digest are neither an internal node nor a single-leaf node.
    #[error("malformed node {}: {len} bytes", Hex(.node))]
    MalformedNode {
        /// The digest the bytes were stored under.
        node: Node,
        /// The length of the stored bytes.
        len: usize,
    },
    /// The eager engine encountered a single-leaf node, which only the compact engine writes.
    #[error("unexpected single-leaf node {} at depth {depth}", Hex(.node))]
    UnexpectedSingleLeaf {
        /// The digest of the single-leaf node.
        node: Node,
        /// The depth at which it was encountered.
        depth: usize,
    },
    /// Two leaves were to be placed in the same terminal slot. Equal keys must be handled as a
    /// value replacement before a two-leaf subtree is built.
    #[error("cannot fit two values into one slot (subtree rooted at depth {depth})")]
    OverfullSubtree {
        /// The depth of the subtree root the two leaves were given for.
        depth: usize,
    },
}

/// Errors encountered when decompressing a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecompressError {
    /// The input is too short to hold the presence bitmap.
    #[error("compressed proof of {len} bytes has no room for the 32 byte bitmap")]
    MissingBitmap {
        /// Length of the input.
        len: usize,
    },
    /// The bitmap declares more siblings than the input carries.
    #[error("compressed proof declares {expected} siblings but carries {actual} bytes")]
    Truncated {
        /// The number of siblings declared by the bitmap.
        expected: usize,
        /// The number of bytes following the bitmap.
        actual: usize,
    },
    /// The input carries bytes beyond the siblings declared by the bitmap.
    #[error("compressed proof has {extra} trailing bytes")]
    TrailingBytes {
        /// The number of bytes left over.
        extra: usize,
    },
}

struct Hex<'a>(&'a Node);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
