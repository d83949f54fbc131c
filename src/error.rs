//! Error types for Timescape operations.

use crate::source::SourceError;
use thiserror::Error;
use timescape_types::TypesError;

/// Errors returned by the query cache and its helpers.
#[derive(Debug, Error)]
pub enum TimescapeError {
    /// A region bound was not a finite number.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// A query was issued for an interval whose endpoints coincide.
    #[error("Empty interval: {0}")]
    EmptyInterval(String),

    /// An interval or duration could not be parsed or is out of order.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A raw record from the data source could not be translated.
    #[error("Invalid record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    /// The data source failed; the cache was left untouched.
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] SourceError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TypesError> for TimescapeError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::InvalidRegion(msg) => TimescapeError::InvalidRegion(msg),
            TypesError::InvalidInterval(msg) | TypesError::InvalidDuration(msg) => {
                TimescapeError::InvalidInterval(msg)
            }
            TypesError::InvalidCoordinate(msg) => TimescapeError::InvalidRecord {
                id: String::new(),
                reason: msg,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, TimescapeError>;
