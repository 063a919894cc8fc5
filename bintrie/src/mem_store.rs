//! In-memory node store.
//!
//! [`MemStore`] keeps every node in a hash map behind a [`RwLock`], so one writer may add nodes
//! while readers walk older roots. Nodes are never removed by the trie, only added.

use crate::metrics::{Metric, Metrics};

use bintrie_core::{trie::Node, NodeStore};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// An in-memory, content-addressed node store counting its reads and writes.
#[derive(Default)]
pub struct MemStore {
    nodes: RwLock<FxHashMap<Node, Vec<u8>>>,
    reads: AtomicU64,
    writes: AtomicU64,
    metrics: Option<Metrics>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store reporting its reads and writes to `metrics`.
    pub fn with_metrics(metrics: Metrics) -> Self {
        MemStore {
            metrics: Some(metrics),
            ..Self::default()
        }
    }

    /// The number of `get` calls served so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// The number of `put` calls served so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// The number of distinct nodes held.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    fn count(&self, counter: &AtomicU64, metric: Metric) {
        counter.fetch_add(1, Ordering::Relaxed);
        if let Some(ref metrics) = self.metrics {
            metrics.count(metric);
        }
    }
}

impl NodeStore for MemStore {
    fn get(&self, node: &Node) -> Option<Vec<u8>> {
        self.count(&self.reads, Metric::NodeReads);
        self.nodes.read().get(node).cloned()
    }

    fn put(&self, node: Node, bytes: Vec<u8>) {
        self.count(&self.writes, Metric::NodeWrites);
        tracing::trace!(node = %hex::encode(node), len = bytes.len(), "put node");
        self.nodes.write().insert(node, bytes);
    }

    fn delete(&self, node: &Node) {
        self.nodes.write().remove(node);
    }
}

impl std::fmt::Debug for MemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemStore")
            .field("nodes", &self.len())
            .field("reads", &self.reads())
            .field("writes", &self.writes())
            .finish()
    }
}
