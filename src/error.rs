//! Error types for loading and lookups.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to build the feature store. Always fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read feature collection {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed feature collection: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feature {index}: unsupported geometry type '{kind}'")]
    UnsupportedGeometry { index: usize, kind: String },

    #[error("feature {index}: position with fewer than two ordinates")]
    InvalidPosition { index: usize },
}

/// Per-request lookup outcome other than a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no IRIS zone found")]
    NotFound,
}
