//! Roots of empty subtrees at every depth.
//!
//! `zero_hashes[256]` is the zero value and `zero_hashes[d]` is the hash of two copies of
//! `zero_hashes[d + 1]`, so `zero_hashes[d]` is the root of a subtree of height `256 - d` in which
//! every leaf is zero. `zero_hashes[0]` is the root of the empty trie.

use crate::hasher::BinaryHash;
use crate::trie::{Node, ZERO_VALUE};

use core::ops::Index;

/// The number of levels below the root. Leaves sit at this depth.
pub const MAX_DEPTH: usize = 256;

/// Table of empty subtree roots, indexed by depth `0..=256`.
#[derive(Clone, PartialEq, Eq)]
pub struct ZeroHashes([Node; MAX_DEPTH + 1]);

impl ZeroHashes {
    /// Compute the table for the given hash function.
    pub fn compute<H: BinaryHash>() -> Self {
        let mut table = [ZERO_VALUE; MAX_DEPTH + 1];
        for depth in (0..MAX_DEPTH).rev() {
            let below = table[depth + 1];
            table[depth] = H::hash2_32_concat(&below, &below);
        }
        ZeroHashes(table)
    }

    /// The root of the empty trie.
    pub fn root(&self) -> Node {
        self.0[0]
    }

    /// Whether `node` denotes an empty subtree at `depth`.
    pub fn is_empty_subtree(&self, depth: usize, node: &Node) -> bool {
        &self.0[depth] == node
    }
}

impl Index<usize> for ZeroHashes {
    type Output = Node;

    fn index(&self, depth: usize) -> &Node {
        &self.0[depth]
    }
}

impl core::fmt::Debug for ZeroHashes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ZeroHashes(root: 0x{})", hex::encode(self.0[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{blake3::Blake3BinaryHasher, Blake3Hasher, NodeHasher};

    #[test]
    fn table_is_built_from_the_leaf_up() {
        let table = ZeroHashes::compute::<Blake3BinaryHasher>();
        assert_eq!(table[MAX_DEPTH], ZERO_VALUE);
        for depth in 0..MAX_DEPTH {
            let below = table[depth + 1];
            assert_eq!(
                table[depth],
                Blake3BinaryHasher::hash2_32_concat(&below, &below)
            );
        }
    }

    #[test]
    fn shared_table_matches_fresh_computation() {
        let shared = Blake3Hasher::zero_hashes();
        assert_eq!(shared, &ZeroHashes::compute::<Blake3BinaryHasher>());
        // computed once, the same allocation every time.
        assert!(core::ptr::eq(shared, Blake3Hasher::zero_hashes()));
    }

    #[test]
    fn depths_are_distinct() {
        let table = Blake3Hasher::zero_hashes();
        assert!(table.is_empty_subtree(17, &table[17]));
        assert!(!table.is_empty_subtree(17, &table[18]));
        assert_ne!(table.root(), table[1]);
    }
}
