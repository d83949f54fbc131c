use thiserror::Error;

/// Errors raised while constructing or parsing value types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// A region bound is NaN or infinite.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// An interval string could not be parsed, or its instants are out of order.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// An ISO-8601 duration expression is malformed.
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// A coordinate literal could not be parsed.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}
