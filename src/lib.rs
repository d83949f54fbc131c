//! Spatiotemporal query cache for located, time-bounded events.
//!
//! An [`EventStore`] answers "which events happened in this time range inside
//! this bounding box" and remembers which `(interval, region)` pairs it has
//! already loaded, so repeated or narrower queries never reach the source.
//!
//! ```rust
//! use timescape::prelude::*;
//!
//! # futures::executor::block_on(async {
//! let source = MemorySource::new(vec![RawEventRecord {
//!     id: "Q1".into(),
//!     label: "Opening".into(),
//!     start: Some("2020-06-01".into()),
//!     end: Some("2020-06-02".into()),
//!     coord: RawCoordinate::Text("Point(16.37 48.21)".into()),
//! }]);
//! let store = EventStore::builder(source).fetch_limit(100).build()?;
//!
//! let year: TemporalInterval = "2020-01-01/2020-12-31".parse()?;
//! let vienna = GeographicRegion::new(16.0, 48.0, 17.0, 49.0)?;
//! let events = store.get_events(&year, &vienna).await?;
//! assert_eq!(events[0].id, "Q1");
//!
//! // A narrower query is answered from cache.
//! let centre = GeographicRegion::new(16.3, 48.1, 16.5, 48.3)?;
//! store.get_events(&year, &centre).await?;
//! assert_eq!(store.source().calls(), 1);
//! # Ok::<(), TimescapeError>(())
//! # }).unwrap();
//! ```

pub mod builder;
pub mod config;
pub mod coverage;
pub mod error;
pub mod event;
pub mod geojson;
pub mod source;
pub mod store;

#[cfg(feature = "wikidata")]
pub mod wikidata;

pub use builder::StoreBuilder;
pub use config::{Config, FoldPolicy, WikidataConfig};
pub use coverage::CoverageRegion;
pub use error::{Result, TimescapeError};
pub use event::{LocatedEvent, RawCoordinate, RawEventRecord};
pub use source::{EventSource, FetchQuery, MemorySource, SourceError};
pub use store::{EventStore, FoldOutcome};

#[cfg(feature = "wikidata")]
pub use wikidata::WikidataSource;

pub use geo::Point;

pub use timescape_types::TypesError;
pub use timescape_types::duration::IsoDuration;
pub use timescape_types::interval::{IntervalBound, IntervalKey, TemporalInterval};
pub use timescape_types::point::GeoLocation;
pub use timescape_types::region::GeographicRegion;
pub use timescape_types::stats::StoreStats;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{EventStore, Result, StoreBuilder, TimescapeError};

    pub use crate::{Config, FoldPolicy};

    pub use crate::{EventSource, FetchQuery, MemorySource, SourceError};

    pub use crate::{LocatedEvent, RawCoordinate, RawEventRecord};

    pub use crate::{GeographicRegion, TemporalInterval};

    pub use geo::Point;

    #[cfg(feature = "wikidata")]
    pub use crate::WikidataSource;
}
