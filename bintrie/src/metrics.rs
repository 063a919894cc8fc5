use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Metrics collector, if active, it provides Counters and Timers
#[derive(Clone)]
pub struct Metrics {
    metrics: Option<Arc<ActiveMetrics>>,
}

/// Metrics that can be collected during execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Counter of node lookups in the store
    NodeReads,
    /// Counter of nodes written to the store
    NodeWrites,
    /// Counter of updates applied to the trie
    Updates,
    /// Timer used to record average update time
    UpdateTime,
    /// Timer used to record average proof creation time
    ProofTime,
}

struct ActiveMetrics {
    node_reads: AtomicU64,
    node_writes: AtomicU64,
    updates: AtomicU64,
    update_time: Timer,
    proof_time: Timer,
}

impl Metrics {
    /// Returns the Metrics object, active or not based on the specified input
    pub fn new(active: bool) -> Self {
        Self {
            metrics: if active {
                Some(Arc::new(ActiveMetrics {
                    node_reads: AtomicU64::new(0),
                    node_writes: AtomicU64::new(0),
                    updates: AtomicU64::new(0),
                    update_time: Timer::new(),
                    proof_time: Timer::new(),
                }))
            } else {
                None
            },
        }
    }

    /// Increase the Counter specified by the input
    ///
    /// panics if the specified [`Metric`] is not a Counter
    pub fn count(&self, metric: Metric) {
        if let Some(ref metrics) = self.metrics {
            metrics.counter(metric).fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Read the Counter specified by the input. Inactive metrics always read zero.
    ///
    /// panics if the specified [`Metric`] is not a Counter
    pub fn get(&self, metric: Metric) -> u64 {
        self.metrics
            .as_ref()
            .map_or(0, |metrics| metrics.counter(metric).load(Ordering::Relaxed))
    }

    /// Returns a guard that, when dropped, will record the time passed since creation
    ///
    /// panics if the specified [`Metric`] is not a Timer
    pub fn record<'a>(&'a self, metric: Metric) -> Option<impl Drop + 'a> {
        self.metrics.as_ref().map(|metrics| {
            let timer = match metric {
                Metric::UpdateTime => &metrics.update_time,
                Metric::ProofTime => &metrics.proof_time,
                _ => panic!("Specified metric is not a Timer"),
            };

            timer.record()
        })
    }

    /// Print collected metrics to stdout
    pub fn print(&self) {
        if let Some(ref metrics) = self.metrics {
            println!("metrics");

            let updates = metrics.updates.load(Ordering::Relaxed);
            println!("  updates               {}", updates);

            let node_reads = metrics.node_reads.load(Ordering::Relaxed);
            println!("  node reads            {}", node_reads);

            let node_writes = metrics.node_writes.load(Ordering::Relaxed);
            println!("  node writes           {}", node_writes);

            if updates != 0 {
                println!(
                    "  writes per update     {:.2}",
                    node_writes as f64 / updates as f64
                );
            }

            if let Some(mean) = metrics.update_time.mean() {
                println!("  update mean           {}", pretty_display_ns(mean));
            }

            if let Some(mean) = metrics.proof_time.mean() {
                println!("  proof mean            {}", pretty_display_ns(mean));
            }
        } else {
            println!("Metrics collection was not activated")
        }
    }
}

impl ActiveMetrics {
    fn counter(&self, metric: Metric) -> &AtomicU64 {
        match metric {
            Metric::NodeReads => &self.node_reads,
            Metric::NodeWrites => &self.node_writes,
            Metric::Updates => &self.updates,
            _ => panic!("Specified metric is not a Counter"),
        }
    }
}

fn pretty_display_ns(ns: u64) -> String {
    // preserve 3 sig figs at minimum.
    let (val, unit) = if ns > 100 * 1_000_000_000 {
        (ns / 1_000_000_000, "s")
    } else if ns > 100 * 1_000_000 {
        (ns / 1_000_000, "ms")
    } else if ns > 100 * 1_000 {
        (ns / 1_000, "us")
    } else {
        (ns, "ns")
    };

    format!("{val} {unit}")
}

struct Timer {
    number_of_records: AtomicU64,
    sum: AtomicU64,
}

impl Timer {
    fn new() -> Self {
        Timer {
            number_of_records: AtomicU64::new(0),
            sum: AtomicU64::new(0),
        }
    }

    fn mean(&self) -> Option<u64> {
        let n = self.number_of_records.load(Ordering::Relaxed);
        let sum = self.sum.load(Ordering::Relaxed);
        sum.checked_div(n)
    }

    fn record<'a>(&'a self) -> impl Drop + 'a {
        struct TimerGuard<'a> {
            start: std::time::Instant,
            n: &'a AtomicU64,
            sum: &'a AtomicU64,
        }

        impl Drop for TimerGuard<'_> {
            fn drop(&mut self) {
                let elapsed = self.start.elapsed().as_nanos() as u64;
                self.n.fetch_add(1, Ordering::Relaxed);
                self.sum.fetch_add(elapsed, Ordering::Relaxed);
            }
        }

        TimerGuard {
            start: std::time::Instant::now(),
            n: &self.number_of_records,
            sum: &self.sum,
        }
    }
}
