//! Compact byte form of path proofs.
//!
//! Layout: a 256 bit presence bitmap followed by the siblings which were kept, in depth order.
//! Bit `i` of the bitmap (byte `i / 8`, mask `1 << (i % 8)`) is set when the sibling at index `i`
//! equals the empty subtree root at depth `i + 1` and was therefore left out.

use crate::error::DecompressError;
use crate::hasher::NodeHasher;
use crate::trie::Node;
use crate::zero_hash::MAX_DEPTH;

use alloc::vec::Vec;
use bitvec::prelude::*;

/// Length in bytes of the presence bitmap.
pub const BITMAP_LEN: usize = MAX_DEPTH / 8;

/// Compress a 256 entry proof. Entries past the 256th are ignored.
pub fn compress<H: NodeHasher>(proof: &[Node]) -> Vec<u8> {
    let zero_hashes = H::zero_hashes();
    let mut bitmap = BitArray::<[u8; BITMAP_LEN], Lsb0>::new([0u8; BITMAP_LEN]);
    let mut kept = Vec::new();
    for (i, sibling) in proof.iter().take(MAX_DEPTH).enumerate() {
        if sibling == &zero_hashes[i + 1] {
            bitmap.set(i, true);
        } else {
            kept.extend_from_slice(sibling);
        }
    }

    let mut out = Vec::with_capacity(BITMAP_LEN + kept.len());
    out.extend_from_slice(&bitmap.into_inner());
    out.extend_from_slice(&kept);
    out
}

/// Restore the 256 entry proof from its compressed form.
pub fn decompress<H: NodeHasher>(bytes: &[u8]) -> Result<Vec<Node>, DecompressError> {
    if bytes.len() < BITMAP_LEN {
        return Err(DecompressError::MissingBitmap { len: bytes.len() });
    }
    let (raw_bitmap, rest) = bytes.split_at(BITMAP_LEN);
    let mut raw = [0u8; BITMAP_LEN];
    raw.copy_from_slice(raw_bitmap);
    let bitmap = BitArray::<[u8; BITMAP_LEN], Lsb0>::new(raw);

    let expected = MAX_DEPTH - bitmap.count_ones();
    let declared_len = expected * 32;
    if rest.len() < declared_len {
        return Err(DecompressError::Truncated {
            expected,
            actual: rest.len(),
        });
    }
    if rest.len() > declared_len {
        return Err(DecompressError::TrailingBytes {
            extra: rest.len() - declared_len,
        });
    }

    let zero_hashes = H::zero_hashes();
    let mut kept = rest.chunks_exact(32);
    let mut proof = Vec::with_capacity(MAX_DEPTH);
    for (i, elided) in bitmap.iter().by_vals().enumerate() {
        if elided {
            proof.push(zero_hashes[i + 1]);
        } else if let Some(chunk) = kept.next() {
            let mut sibling = [0u8; 32];
            sibling.copy_from_slice(chunk);
            proof.push(sibling);
        }
    }
    Ok(proof)
}
