//! Trie proofs and proof verification.
//!
//! The trie is an authenticated data structure: the value under any key can be proven against the
//! root with the 256 sibling digests met on the way down to it. This module builds such proofs
//! ([`make_merkle_proof`]), checks them ([`verify_proof`]), and converts them to and from a compact
//! byte form in which siblings equal to the empty subtree root for their depth are elided.

pub use compress::{compress, decompress, BITMAP_LEN};
pub use path_proof::{make_merkle_proof, verify_proof, PathProof};

mod compress;
mod path_proof;
