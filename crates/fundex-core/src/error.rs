//! Error types for catalog loading
//!
//! Loading is the only fallible operation in the core. Faceting, filtering and
//! projection are total over decoded records.

use thiserror::Error;

/// Failure of a single catalog load attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The remote call completed with a non-success HTTP status
    #[error("catalog source returned HTTP {0}")]
    Transport(u16),

    /// The remote call could not complete (DNS, connect, timeout, body read)
    #[error("catalog source unreachable: {0}")]
    Network(String),

    /// The response body was not the expected catalog payload
    #[error("catalog payload rejected: {0}")]
    Schema(String),
}

impl LoadError {
    /// Get the error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            LoadError::Transport(_) => "transport",
            LoadError::Network(_) => "network",
            LoadError::Schema(_) => "schema",
        }
    }

    /// HTTP status carried by a transport failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Transport(status) => Some(*status),
            _ => None,
        }
    }
}

/// Result alias for catalog loading
pub type LoadResult<T> = Result<T, LoadError>;
