//! Error taxonomy for the journal core.
//!
//! Only [`ValidationError`] ever reaches a caller of the journal. Store and
//! cache errors are absorbed by the synchronization layer and turned into
//! fallbacks.

use std::path::PathBuf;

/// A candidate trade that cannot be turned into a journal record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid value {value:?} for {field}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("{field} is not a number: {value:?}")]
    InvalidNumericField { field: &'static str, value: String },

    #[error("{field} is not a valid {expected}: {value:?}")]
    InvalidTemporalField {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("unknown trade field {0:?}")]
    UnknownField(String),
}

/// Failure reported by a remote trade store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Transport, timeout or server-side failure.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// The service refused the record (schema or constraint violation).
    #[error("remote store rejected the record: {0}")]
    Rejected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("local cache at {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to encode trade set: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
