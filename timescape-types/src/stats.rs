use serde::{Deserialize, Serialize};

/// Point-in-time statistics for a query cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Queries answered from existing coverage
    pub hits: u64,
    /// Queries that went to the data source
    pub misses: u64,
    /// Queries short-circuited because the region had zero area
    pub skipped: u64,
    /// Fetches that returned an error
    pub fetch_failures: u64,
    /// Raw records dropped during translation
    pub rejected_records: u64,
    /// Events currently known
    pub events: usize,
    /// Coverage regions across all buckets
    pub coverage_regions: usize,
    /// Distinct interval buckets
    pub buckets: usize,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of non-skipped queries.
    pub fn queries(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of queries served from cache, `0.0` when none were made.
    pub fn hit_ratio(&self) -> f64 {
        match self.queries() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}
