/// How a [`crate::Trie`] lays out nodes in its store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Materialize all 256 levels of every path, including those of the empty trie.
    Eager,
    /// Elide empty subtrees and collapse subtrees holding a single leaf into one node.
    #[default]
    Compact,
}

/// Options when opening a [`crate::Trie`] instance.
#[derive(Debug, Clone)]
pub struct Options {
    /// The engine used to read and update the trie.
    pub(crate) strategy: Strategy,
    /// Enable or disable metrics collection.
    pub(crate) metrics: bool,
}

impl Options {
    /// Create a new `Options` instance with the default values.
    pub fn new() -> Self {
        Self {
            strategy: Strategy::Compact,
            metrics: false,
        }
    }

    /// Set the engine used to read and update the trie.
    ///
    /// Both engines produce the same roots for the same contents, but a store written by one
    /// cannot be read by the other.
    ///
    /// Default: compact.
    pub fn strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    /// Set metrics collection on or off.
    ///
    /// The trie itself counts updates and times updates and proofs. Node reads and writes are
    /// counted by the store: [`crate::Trie::new`] wires its [`crate::MemStore`] to the trie's
    /// metrics, while a store passed to [`crate::Trie::with_store`] or [`crate::Trie::open`]
    /// reports only to the [`crate::Metrics`] it was built with, if any.
    ///
    /// Default: off.
    pub fn metrics(&mut self, metrics: bool) {
        self.metrics = metrics;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
