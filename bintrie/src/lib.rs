//! A sparse binary Merkle trie over 256 bit keys and values.
//!
//! [`Trie`] binds a node store, a layout [`Strategy`] and a current root. Every update adds nodes
//! to the store and moves the root; older roots remain readable through [`Trie::get_at`].
//!
//! ```
//! use bintrie::{Blake3Hasher, Options, Trie};
//!
//! let mut trie = Trie::<Blake3Hasher>::new(Options::new());
//! let mut key = [0u8; 32];
//! key[31] = 1;
//! trie.update(key, [0x11; 32]).unwrap();
//! assert_eq!(trie.get(&key).unwrap(), [0x11; 32]);
//!
//! let proof = trie.prove(&key).unwrap();
//! assert!(proof.verify::<Blake3Hasher>(trie.root(), &key, [0x11; 32]));
//! ```

use std::marker::PhantomData;

use anyhow::Context as _;
use bintrie_core::{compact, eager, proof};

pub use bintrie_core::{
    hasher::{BinaryHash, BinaryHasher, NodeHasher},
    proof::PathProof,
    trie::{KeyPath, Node, Value, ZERO_VALUE},
    DecompressError, NodeStore, TrieError,
};

#[cfg(feature = "blake3-hasher")]
pub use bintrie_core::hasher::Blake3Hasher;
#[cfg(feature = "keccak-hasher")]
pub use bintrie_core::hasher::Keccak256Hasher;
#[cfg(feature = "sha2-hasher")]
pub use bintrie_core::hasher::Sha2Hasher;

pub use mem_store::MemStore;
pub use metrics::{Metric, Metrics};
pub use options::{Options, Strategy};

mod mem_store;
mod metrics;
mod options;

/// A trie hashed with Keccak-256.
#[cfg(feature = "keccak-hasher")]
pub type KeccakTrie<S = MemStore> = Trie<Keccak256Hasher, S>;

/// A handle to a trie: a store, a strategy and the current root.
///
/// The handle is the single writer of its root. Reads take `&self` and may run concurrently with
/// each other.
pub struct Trie<H, S = MemStore> {
    store: S,
    root: Node,
    strategy: Strategy,
    metrics: Metrics,
    _marker: PhantomData<H>,
}

impl<H: NodeHasher> Trie<H, MemStore> {
    /// Create an empty trie over a fresh in-memory store.
    pub fn new(options: Options) -> Self {
        let metrics = Metrics::new(options.metrics);
        let store = MemStore::with_metrics(metrics.clone());
        Self::create(store, &options, metrics)
    }
}

impl<H: NodeHasher, S: NodeStore> Trie<H, S> {
    /// Create an empty trie in the given store.
    ///
    /// With the eager strategy this writes the 256 nodes of the empty trie. Node reads and writes
    /// are not counted in [`Trie::metrics`]; see [`Options::metrics`].
    pub fn with_store(store: S, options: Options) -> Self {
        let metrics = Metrics::new(options.metrics);
        Self::create(store, &options, metrics)
    }

    /// Open the trie with the given root, which must have been produced in `store` by the same
    /// strategy and hasher.
    ///
    /// As with [`Trie::with_store`], node reads and writes are not counted in [`Trie::metrics`].
    pub fn open(store: S, root: Node, options: Options) -> Self {
        tracing::debug!(root = %hex::encode(root), strategy = ?options.strategy, "opening trie");
        Trie {
            store,
            root,
            strategy: options.strategy,
            metrics: Metrics::new(options.metrics),
            _marker: PhantomData,
        }
    }

    fn create(store: S, options: &Options, metrics: Metrics) -> Self {
        let root = match options.strategy {
            Strategy::Eager => eager::new_tree::<H>(&store),
            Strategy::Compact => compact::new_tree::<H>(),
        };
        tracing::debug!(
            root = %hex::encode(root),
            strategy = ?options.strategy,
            "created empty trie"
        );
        Trie {
            store,
            root,
            strategy: options.strategy,
            metrics,
            _marker: PhantomData,
        }
    }

    /// Returns the current root node of the trie.
    pub fn root(&self) -> Node {
        self.root
    }

    /// Returns true if the trie holds no non-zero value.
    pub fn is_empty(&self) -> bool {
        self.root == H::zero_hashes().root()
    }

    /// The strategy the trie was opened with.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The underlying node store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The metrics collector of this trie.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Read the value under `key` at the current root. Absent keys read as [`ZERO_VALUE`].
    pub fn get(&self, key: &KeyPath) -> anyhow::Result<Value> {
        self.get_at(self.root, key)
    }

    /// Read the value under `key` at any root previously produced in this store.
    pub fn get_at(&self, root: Node, key: &KeyPath) -> anyhow::Result<Value> {
        let value = match self.strategy {
            Strategy::Eager => eager::get(&self.store, root, key),
            Strategy::Compact => compact::get::<H>(&self.store, root, key),
        };
        value.with_context(|| {
            format!(
                "failed to read key 0x{} at root 0x{}",
                hex::encode(key),
                hex::encode(root)
            )
        })
    }

    /// Set the value under `key` and return the new root. Writing [`ZERO_VALUE`] removes the key.
    ///
    /// On failure the root is left unchanged.
    pub fn update(&mut self, key: KeyPath, value: Value) -> anyhow::Result<Node> {
        let _timer = self.metrics.record(Metric::UpdateTime);
        let new_root = match self.strategy {
            Strategy::Eager => eager::update::<H>(&self.store, self.root, &key, value),
            Strategy::Compact => compact::update::<H>(&self.store, self.root, &key, value),
        }
        .with_context(|| {
            format!(
                "failed to update key 0x{} at root 0x{}",
                hex::encode(key),
                hex::encode(self.root)
            )
        })?;

        tracing::debug!(
            key = %hex::encode(key),
            prev_root = %hex::encode(self.root),
            root = %hex::encode(new_root),
            "updated trie"
        );
        self.metrics.count(Metric::Updates);
        self.root = new_root;
        Ok(new_root)
    }

    /// Apply updates one after the other and return the final root.
    ///
    /// Updates are not atomic as a group: if one fails, the root stays at the result of the last
    /// update which succeeded.
    pub fn multi_update(
        &mut self,
        ops: impl IntoIterator<Item = (KeyPath, Value)>,
    ) -> anyhow::Result<Node> {
        for (key, value) in ops {
            self.update(key, value)?;
        }
        Ok(self.root)
    }

    /// Prove the value under `key` at the current root.
    pub fn prove(&self, key: &KeyPath) -> anyhow::Result<PathProof> {
        let _timer = self.metrics.record(Metric::ProofTime);
        proof::make_merkle_proof::<H>(&self.store, self.root, key).with_context(|| {
            format!(
                "failed to prove key 0x{} at root 0x{}",
                hex::encode(key),
                hex::encode(self.root)
            )
        })
    }

    /// Prove the value under `key` at the current root, in compressed form.
    pub fn prove_compressed(&self, key: &KeyPath) -> anyhow::Result<Vec<u8>> {
        Ok(self.prove(key)?.compress::<H>())
    }

    /// Verify a proof of `value` under `key` against `root`.
    pub fn verify(proof: &PathProof, root: Node, key: &KeyPath, value: Value) -> bool {
        proof.verify::<H>(root, key, value)
    }

    /// Verify a compressed proof of `value` under `key` against `root`.
    ///
    /// Malformed input is an error; a well-formed proof which does not match is `Ok(false)`.
    pub fn verify_compressed(
        bytes: &[u8],
        root: Node,
        key: &KeyPath,
        value: Value,
    ) -> anyhow::Result<bool> {
        let proof = PathProof::decompress::<H>(bytes).context("malformed compressed proof")?;
        Ok(Self::verify(&proof, root, key, value))
    }
}
