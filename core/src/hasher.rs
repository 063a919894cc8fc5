//! Hashers (feature-gated) and utilities for implementing them.

use crate::trie::{InternalData, Node};
use crate::zero_hash::ZeroHashes;

/// A trie node hash function.
///
/// Internal node digests are the plain hash of the left child digest concatenated with the
/// right child digest. There is no domain separation between node kinds: a single-leaf node is
/// addressed by the same digest the fully materialized subtree would have.
pub trait NodeHasher {
    /// Hash an internal node.
    fn hash_internal(data: &InternalData) -> Node;

    /// The table of empty subtree roots for this hasher.
    fn zero_hashes() -> &'static ZeroHashes;
}

/// A simple trait for representing binary hash functions.
pub trait BinaryHash {
    /// Given a bit-string, produce a 32-bit hash.
    fn hash(input: &[u8]) -> [u8; 32];

    /// An optional specialization of `hash` where there are two 32-byte inputs, left and right.
    fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut buf = [0u8; 64];
        buf[0..32].copy_from_slice(left);
        buf[32..64].copy_from_slice(right);
        Self::hash(&buf)
    }

    /// The table of empty subtree roots under this hash function.
    ///
    /// Implement with [`zero_hash_table`], which builds the table once per process.
    fn zero_hashes() -> &'static ZeroHashes;
}

/// A node hasher constructed from a simple binary hasher.
///
/// The binary hash wrapped by this structure must behave approximately like a random oracle over
/// the space 2^256. Functions like Sha2/Blake3/Keccak all meet these criteria.
pub struct BinaryHasher<H>(core::marker::PhantomData<H>);

impl<H: BinaryHash> NodeHasher for BinaryHasher<H> {
    fn hash_internal(data: &InternalData) -> Node {
        H::hash2_32_concat(&data.left, &data.right)
    }

    fn zero_hashes() -> &'static ZeroHashes {
        H::zero_hashes()
    }
}

/// Implements [`BinaryHash::zero_hashes`] with a table computed on first use.
///
/// Must be expanded inside an `impl BinaryHash for ...` block.
#[macro_export]
macro_rules! zero_hash_table {
    () => {
        fn zero_hashes() -> &'static $crate::zero_hash::ZeroHashes {
            static TABLE: ::std::sync::OnceLock<$crate::zero_hash::ZeroHashes> =
                ::std::sync::OnceLock::new();
            TABLE.get_or_init($crate::zero_hash::ZeroHashes::compute::<Self>)
        }
    };
}

#[cfg(feature = "keccak-hasher")]
pub use keccak::Keccak256Hasher;

/// A node hasher making use of keccak-256.
#[cfg(feature = "keccak-hasher")]
pub mod keccak {
    use super::{BinaryHash, BinaryHasher};
    use sha3::{Digest, Keccak256};

    /// A [`BinaryHash`] implementation for Keccak-256.
    pub struct Keccak256BinaryHasher;

    /// A wrapper around keccak-256 for use in the trie.
    pub type Keccak256Hasher = BinaryHasher<Keccak256BinaryHasher>;

    impl BinaryHash for Keccak256BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            Keccak256::digest(value).into()
        }

        fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
            let mut hasher = Keccak256::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }

        crate::zero_hash_table!();
    }
}

#[cfg(any(feature = "blake3-hasher", test))]
pub use self::blake3::Blake3Hasher;

/// A node hasher making use of blake3.
#[cfg(any(feature = "blake3-hasher", test))]
pub mod blake3 {
    use super::{BinaryHash, BinaryHasher};

    /// A [`BinaryHash`] implementation for Blake3.
    pub struct Blake3BinaryHasher;

    /// A wrapper around Blake3 for use in the trie.
    pub type Blake3Hasher = BinaryHasher<Blake3BinaryHasher>;

    impl BinaryHash for Blake3BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            blake3::hash(value).into()
        }

        fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
            let mut hasher = blake3::Hasher::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }

        crate::zero_hash_table!();
    }
}

#[cfg(feature = "sha2-hasher")]
pub use self::sha2::Sha2Hasher;

/// A node hasher making use of sha2-256.
#[cfg(feature = "sha2-hasher")]
pub mod sha2 {
    use super::{BinaryHash, BinaryHasher};
    use sha2::{Digest, Sha256};

    /// A [`BinaryHash`] implementation for Sha2.
    pub struct Sha2BinaryHasher;

    /// A wrapper around sha2-256 for use in the trie.
    pub type Sha2Hasher = BinaryHasher<Sha2BinaryHasher>;

    impl BinaryHash for Sha2BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(value);
            hasher.finalize().into()
        }

        fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }

        crate::zero_hash_table!();
    }
}
