//! The spatiotemporal query cache.
//!
//! `EventStore` keeps every event it has seen, keyed by id, and a list of
//! coverage regions per interval bucket. A query is a cache hit when some
//! coverage region in the bucket for the requested interval contains the
//! requested region; otherwise the data source is asked and the answer is
//! folded into the bucket.

use crate::builder::StoreBuilder;
use crate::config::Config;
use crate::coverage::CoverageRegion;
use crate::error::{Result, TimescapeError};
use crate::event::{LocatedEvent, RawEventRecord};
use crate::source::{EventSource, FetchQuery};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use timescape_types::interval::{IntervalKey, TemporalInterval};
use timescape_types::region::GeographicRegion;
use timescape_types::stats::StoreStats;

mod fold;
mod stats;

pub use fold::FoldOutcome;
use stats::StatsRecorder;

/// Spatiotemporal query cache in front of an [`EventSource`].
///
/// All methods take `&self`; wrap the store in an `Arc` to share it between
/// tasks. Lookups take a read lock. The miss path holds no lock while the
/// fetch is in flight and takes the write lock only to fold the result, so
/// two concurrent misses for the same request both fetch and both fold.
///
/// # Examples
///
/// ```rust
/// use timescape::{EventStore, MemorySource, RawCoordinate, RawEventRecord};
/// use timescape::{GeographicRegion, TemporalInterval};
///
/// # futures::executor::block_on(async {
/// let source = MemorySource::new(vec![RawEventRecord {
///     id: "Q1".into(),
///     label: "Test".into(),
///     start: Some("2020-06-01".into()),
///     end: Some("2020-06-02".into()),
///     coord: RawCoordinate::Text("Point(5 5)".into()),
/// }]);
/// let store = EventStore::new(source);
///
/// let year: TemporalInterval = "2020-01-01/2020-12-31".parse().unwrap();
/// let area = GeographicRegion::new(0.0, 0.0, 10.0, 10.0).unwrap();
///
/// let events = store.get_events(&year, &area).await.unwrap();
/// assert_eq!(events.len(), 1);
/// assert!(store.get_event_by_id("Q1").is_some());
/// # });
/// ```
pub struct EventStore<S> {
    source: S,
    config: Config,
    inner: RwLock<StoreInner>,
    stats: StatsRecorder,
}

#[derive(Default)]
struct StoreInner {
    events_by_id: FxHashMap<String, LocatedEvent>,
    /// Coverage per interval bucket, each list sorted by ascending area
    coverage: FxHashMap<IntervalKey, Vec<CoverageRegion>>,
}

impl StoreInner {
    fn find_coverage(
        &self,
        interval: &TemporalInterval,
        region: &GeographicRegion,
    ) -> Option<&CoverageRegion> {
        self.coverage
            .get(&interval.key())?
            .iter()
            .find(|coverage| coverage.region().contains(region))
    }
}

impl<S: EventSource> EventStore<S> {
    /// Create a store with the default configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: Config::default(),
            inner: RwLock::new(StoreInner::default()),
            stats: StatsRecorder::default(),
        }
    }

    /// Create a store with a validated configuration.
    pub fn with_config(source: S, config: Config) -> Result<Self> {
        config.validate().map_err(TimescapeError::InvalidConfig)?;
        Ok(Self {
            config,
            ..Self::new(source)
        })
    }

    /// Start a [`StoreBuilder`] over `source`.
    pub fn builder(source: S) -> StoreBuilder<S> {
        StoreBuilder::new(source)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Find a single event by its external id.
    pub fn get_event_by_id(&self, id: &str) -> Option<LocatedEvent> {
        self.inner.read().events_by_id.get(id).cloned()
    }

    /// Number of events known to the store.
    pub fn len(&self) -> usize {
        self.inner.read().events_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().events_by_id.is_empty()
    }

    /// Coverage regions in the bucket for `interval`, smallest first.
    pub fn coverage(&self, interval: &TemporalInterval) -> Vec<CoverageRegion> {
        self.inner
            .read()
            .coverage
            .get(&interval.key())
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `get_events(interval, region)` would be answered without a fetch.
    pub fn is_covered(&self, interval: &TemporalInterval, region: &GeographicRegion) -> bool {
        self.inner.read().find_coverage(interval, region).is_some()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        self.stats.snapshot(
            inner.events_by_id.len(),
            inner.coverage.values().map(Vec::len).sum(),
            inner.coverage.len(),
        )
    }

    /// Resolve a time range and bounding box to the events inside it.
    ///
    /// - A zero-area region returns an empty list without touching the source.
    ///   A NaN area (an infinite side times a zero side) counts as zero.
    /// - An empty interval is rejected with [`TimescapeError::EmptyInterval`].
    /// - On a hit, the coverage's events are re-filtered against the exact
    ///   request and returned ordered by start time, then id.
    /// - On a miss, the source is queried, the records become a new coverage
    ///   region for exactly `(interval, region)`, and the translated events are
    ///   returned in source order. A failed fetch leaves the store unchanged.
    pub async fn get_events(
        &self,
        interval: &TemporalInterval,
        region: &GeographicRegion,
    ) -> Result<Vec<LocatedEvent>> {
        let area = region.area();
        if area == 0.0 || area.is_nan() {
            log::debug!("Skipping zero-area region {}", region);
            self.stats.record_skipped();
            return Ok(Vec::new());
        }
        if interval.is_empty() {
            return Err(TimescapeError::EmptyInterval(interval.to_string()));
        }

        if let Some(events) = self.lookup(interval, region) {
            self.stats.record_hit();
            return Ok(events);
        }

        self.stats.record_miss();
        log::info!("Loading coverage {}|{} from source", interval, region);

        let query = FetchQuery {
            interval: *interval,
            region: *region,
            limit: self.config.fetch_limit,
        };
        let records = match self.source.fetch_events(&query).await {
            Ok(records) => records,
            Err(e) => {
                self.stats.record_fetch_failure();
                log::warn!("Fetch for {}|{} failed: {}", interval, region, e);
                return Err(e.into());
            }
        };

        let events = self.translate(records);
        self.register_coverage(interval, region, &events);
        Ok(events)
    }

    /// Record `events` as the complete contents of `(interval, region)` and
    /// fold the resulting coverage into its bucket.
    ///
    /// This is the write half of a cache miss, exposed so callers can seed
    /// the store from data they already hold.
    pub fn register_coverage(
        &self,
        interval: &TemporalInterval,
        region: &GeographicRegion,
        events: &[LocatedEvent],
    ) -> FoldOutcome {
        let mut coverage = CoverageRegion::new(*interval, *region);
        let mut inner = self.inner.write();

        for event in events {
            inner.events_by_id.insert(event.id.clone(), event.clone());
            coverage.register_event(event);
        }

        let key = coverage.key();
        let bucket = inner.coverage.entry(interval.key()).or_default();
        let outcome = fold::fold(bucket, coverage, self.config.fold_policy);
        log::debug!(
            "Folded coverage {} ({} events): {:?}, bucket now holds {}",
            key,
            events.len(),
            outcome,
            bucket.len()
        );
        outcome
    }

    fn lookup(
        &self,
        interval: &TemporalInterval,
        region: &GeographicRegion,
    ) -> Option<Vec<LocatedEvent>> {
        let inner = self.inner.read();
        let coverage = inner.find_coverage(interval, region)?;
        log::info!("Cached coverage {}", coverage.key());

        let mut events: Vec<LocatedEvent> = coverage
            .event_ids()
            .filter_map(|id| inner.events_by_id.get(id))
            .filter(|event| {
                LocatedEvent::in_period(interval, event) && LocatedEvent::in_place(region, event)
            })
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.interval
                .start_instant()
                .cmp(&b.interval.start_instant())
                .then_with(|| a.id.cmp(&b.id))
        });
        Some(events)
    }

    fn translate(&self, records: Vec<RawEventRecord>) -> Vec<LocatedEvent> {
        let total = records.len();
        let events: Vec<LocatedEvent> = records
            .into_iter()
            .filter_map(|record| match LocatedEvent::from_record(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    log::warn!("Skipping malformed record: {}", e);
                    None
                }
            })
            .collect();

        let rejected = total - events.len();
        if rejected > 0 {
            self.stats.record_rejected(rejected as u64);
        }
        events
    }
}
