//! # timescape-types
//!
//! Value types for the Timescape spatiotemporal query cache:
//!
//! - **Time**: `TemporalInterval`, `IntervalBound`, `IsoDuration`
//! - **Space**: `GeographicRegion` plus `geo:` URI and WKT point helpers
//! - **Statistics**: `StoreStats`
//!
//! Every type is immutable once built; derived values come from pure methods.
//!
//! ## Examples
//!
//! ```rust
//! use timescape_types::interval::TemporalInterval;
//! use timescape_types::region::GeographicRegion;
//! use geo::Point;
//!
//! let year: TemporalInterval = "2020-01-01/2020-12-31".parse()?;
//! let europe = GeographicRegion::new(-10.0, 35.0, 30.0, 60.0)?;
//!
//! assert!(!year.is_empty());
//! assert!(europe.contains_point(&Point::new(16.37, 48.21)));
//! # Ok::<(), timescape_types::TypesError>(())
//! ```

pub mod duration;
pub mod error;
pub mod interval;
pub mod point;
pub mod region;
pub mod stats;

pub use error::TypesError;
