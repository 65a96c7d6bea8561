//! Error types for searchgrid.
//!
//! Every crate in the workspace returns [`Result`] with this [`Error`]. The
//! variants follow the lifecycle of a datagrid request: resolving filters,
//! building the query, validating the page request, and executing against
//! the search backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Boxed source error carried by backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving, building, or executing a search.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Neither a declared type nor a guess was available for a field.
    #[error("Cannot resolve a filter type for field '{field}'")]
    UnresolvableField {
        /// Field that could not be resolved
        field: String,
    },

    /// A caller-supplied option (or submitted value) is incompatible with
    /// the filter kind.
    #[error("Invalid option '{option}' on filter '{field}': {message}")]
    InvalidOption {
        /// Field the filter is registered for
        field: String,
        /// Offending option name (`value` for submitted values)
        option: String,
        /// What went wrong
        message: String,
    },

    /// The requested page has a negative offset or a non-positive limit.
    #[error("Invalid page request (offset={offset}, limit={limit}): {message}")]
    InvalidPageRequest {
        /// Requested offset
        offset: i64,
        /// Requested limit
        limit: i64,
        /// What went wrong
        message: String,
    },

    /// The search backend failed to execute the query.
    #[error("Backend execution failed: {message}")]
    Backend {
        /// Human-readable error message
        message: String,
        /// Underlying transport or query error
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error with the path that caused it
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for searchgrid operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Only backend failures are transient. Resolution, option, and page
    /// errors are permanent for the same input. Nothing in searchgrid acts
    /// on this; it exists for callers that wrap execution in a retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Backend { .. } => true,
            Error::Io { .. } => false,
            Error::UnresolvableField { .. } => false,
            Error::InvalidOption { .. } => false,
            Error::InvalidPageRequest { .. } => false,
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates an unresolvable-field error.
    pub fn unresolvable<S: Into<String>>(field: S) -> Self {
        Error::UnresolvableField {
            field: field.into(),
        }
    }

    /// Creates an invalid-option error.
    pub fn invalid_option<F, O, M>(field: F, option: O, message: M) -> Self
    where
        F: Into<String>,
        O: Into<String>,
        M: Into<String>,
    {
        Error::InvalidOption {
            field: field.into(),
            option: option.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-page-request error.
    pub fn invalid_page<S: Into<String>>(offset: i64, limit: i64, message: S) -> Self {
        Error::InvalidPageRequest {
            offset,
            limit,
            message: message.into(),
        }
    }

    /// Creates a backend error with a message.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Error::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a backend error with a message and source error.
    pub fn backend_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<BoxError>,
    {
        Error::Backend {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a backend error for a transport call that exceeded its timeout.
    pub fn backend_timeout(timeout: Duration, elapsed: tokio::time::error::Elapsed) -> Self {
        Error::backend_with_source(
            format!("transport call timed out after {}ms", timeout.as_millis()),
            elapsed,
        )
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error tagged with the path involved.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
