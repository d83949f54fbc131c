use std::sync::atomic::{AtomicU64, Ordering};
use timescape_types::stats::StoreStats;

/// Lock-free counters updated on every query.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    skipped: AtomicU64,
    fetch_failures: AtomicU64,
    rejected_records: AtomicU64,
}

impl StatsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self, count: u64) {
        self.rejected_records.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self, events: usize, coverage_regions: usize, buckets: usize) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            rejected_records: self.rejected_records.load(Ordering::Relaxed),
            events,
            coverage_regions,
            buckets,
        }
    }
}
