//! Core operations and types of a sparse binary Merkle trie.
//!
//! The trie maps 256 bit keys to 256 bit values under a single 256 bit root. Two engines build it
//! over a content-addressed [`store::NodeStore`]:
//!   - [`eager`], which materializes all 256 levels of every path;
//!   - [`compact`], which elides empty subtrees and collapses subtrees holding a single leaf into
//!     one node.
//!
//! Both produce the same roots for the same contents, and proofs from [`proof`] verify against
//! either. All operations are free functions over an explicit store; nothing here keeps state of
//! its own besides the per-hasher table of empty subtree roots.

extern crate alloc;

pub mod compact;
pub mod eager;
pub mod error;
pub mod hasher;
pub mod key_path;
pub mod proof;
pub mod store;
pub mod trie;
pub mod zero_hash;

pub use error::{DecompressError, TrieError};
pub use store::NodeStore;
