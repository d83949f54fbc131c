//! Data source abstraction for Timescape
//!
//! The query cache never talks to a remote service directly. It asks an
//! [`EventSource`] for raw records covering a time range and a bounding box,
//! and folds the answer into its index.

use crate::event::{LocatedEvent, RawEventRecord};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use timescape_types::interval::TemporalInterval;
use timescape_types::region::GeographicRegion;

/// Parameters of a single fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchQuery {
    pub interval: TemporalInterval,
    pub region: GeographicRegion,
    /// Maximum number of records the source may return
    pub limit: usize,
}

/// Failures reported by a data source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The request never produced a response (connection, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with an error status.
    #[error("service error {status}: {message}")]
    Service { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The source cannot express this query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Trait for remote or local providers of located events.
///
/// Implementations must honor `query.limit` as an upper bound on the number
/// of returned records, and report failures instead of returning a partial
/// result.
pub trait EventSource: Send + Sync {
    fn fetch_events(
        &self,
        query: &FetchQuery,
    ) -> impl Future<Output = Result<Vec<RawEventRecord>, SourceError>> + Send;
}

impl<S: EventSource> EventSource for std::sync::Arc<S> {
    fn fetch_events(
        &self,
        query: &FetchQuery,
    ) -> impl Future<Output = Result<Vec<RawEventRecord>, SourceError>> + Send {
        (**self).fetch_events(query)
    }
}

/// In-memory source backed by a fixed list of records.
///
/// Records are filtered by time containment and region membership, then
/// truncated to the query limit. Useful for tests, demos, and offline
/// snapshots.
pub struct MemorySource {
    records: Vec<RawEventRecord>,
    failure: Mutex<Option<SourceError>>,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(records: Vec<RawEventRecord>) -> Self {
        Self {
            records,
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every following fetch fail with `error`.
    pub fn fail_with(&self, error: SourceError) {
        *self.failure.lock() = Some(error);
    }

    /// Resume answering fetches normally.
    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Number of fetches received so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn matching(&self, query: &FetchQuery) -> Vec<RawEventRecord> {
        self.records
            .iter()
            .filter(|record| match LocatedEvent::from_record((*record).clone()) {
                Ok(event) => {
                    LocatedEvent::in_period(&query.interval, &event)
                        && LocatedEvent::in_place(&query.region, &event)
                }
                // Let the cache see and reject malformed records.
                Err(_) => true,
            })
            .take(query.limit)
            .cloned()
            .collect()
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl EventSource for MemorySource {
    fn fetch_events(
        &self,
        query: &FetchQuery,
    ) -> impl Future<Output = Result<Vec<RawEventRecord>, SourceError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(self.matching(query)),
        };
        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawCoordinate;

    fn record(id: &str, lon: f64, lat: f64) -> RawEventRecord {
        RawEventRecord {
            id: id.into(),
            label: id.into(),
            start: Some("2020-06-01".into()),
            end: Some("2020-06-02".into()),
            coord: RawCoordinate::Text(format!("Point({} {})", lon, lat)),
        }
    }

    fn query(limit: usize) -> FetchQuery {
        FetchQuery {
            interval: "2020-01-01/2020-12-31".parse().unwrap(),
            region: GeographicRegion::new(0.0, 0.0, 10.0, 10.0).unwrap(),
            limit,
        }
    }

    #[tokio::test]
    async fn test_memory_source_filters_and_limits() {
        let source = MemorySource::new(vec![
            record("Q1", 1.0, 1.0),
            record("Q2", 2.0, 2.0),
            record("Q3", 50.0, 50.0),
        ]);

        let all = source.fetch_events(&query(10)).await.unwrap();
        assert_eq!(all.len(), 2);

        let one = source.fetch_events(&query(1)).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "Q1");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_memory_source_failure_mode() {
        let source = MemorySource::new(vec![record("Q1", 1.0, 1.0)]);
        source.fail_with(SourceError::Transport("connection refused".into()));

        let err = source.fetch_events(&query(10)).await.unwrap_err();
        assert_eq!(err, SourceError::Transport("connection refused".into()));

        source.recover();
        assert_eq!(source.fetch_events(&query(10)).await.unwrap().len(), 1);
        assert_eq!(source.calls(), 2);
    }
}
