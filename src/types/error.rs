//! Error types for the sales order engine
//!
//! This module defines all error types used across ingestion and search.
//! Failures are recovered as close to their origin as possible: per-line
//! parse failures never leave the file parser, duplicate-key rejections
//! never leave the batch writer, and only input validation and startup
//! connectivity failures reach the caller.
//!
//! # Error Categories
//!
//! - **Line errors**: a single malformed fixed-width line; recoverable,
//!   the line is skipped and processing continues.
//! - **Repository errors**: typed outcomes of the storage layer, replacing
//!   ad hoc error-shape inspection with explicit variants.
//! - **Order errors**: the top-level taxonomy surfaced to callers of the
//!   upload and search entry points.

use thiserror::Error;

/// Failure to parse one fixed-width line
///
/// Always local to the line: the parser logs the failure, counts the line
/// as invalid, and continues with the rest of the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// The line is shorter than the fixed-width layout requires
    #[error("line is {length} characters long, expected at least {expected}")]
    TooShort {
        /// Actual line length in characters
        length: usize,
        /// Minimum width of the layout
        expected: usize,
    },

    /// An id column does not hold a valid integer
    #[error("field '{field}' is not a valid integer: '{value}'")]
    InvalidNumber {
        /// Name of the offending column
        field: &'static str,
        /// Trimmed column content
        value: String,
    },

    /// The product value column is not a non-negative decimal
    #[error("product value is not a non-negative decimal: '{value}'")]
    InvalidValue {
        /// Trimmed column content
        value: String,
    },

    /// The date column is not a valid `YYYYMMDD` date
    #[error("date is not a valid YYYYMMDD value: '{value}'")]
    InvalidDate {
        /// Trimmed column content
        value: String,
    },
}

/// Typed result of a storage operation
///
/// Implementations of the repository trait report rejections through
/// these variants instead of exposing backend-specific error shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected one or more records
    ///
    /// With unordered insert semantics the backend keeps writing past the
    /// duplicates; `inserted` reports how many records it still accepted.
    /// A backend that cannot report partial results returns `inserted: 0`,
    /// attributing the whole batch to the rejection.
    #[error("duplicate key: {inserted} of {attempted} records inserted")]
    DuplicateKey {
        /// Records the backend accepted despite the rejection
        inserted: usize,
        /// Records submitted in the call
        attempted: usize,
    },

    /// The named index does not exist
    ///
    /// Tolerated as a no-op when dropping the superseded uniqueness index.
    #[error("index not found: {name}")]
    IndexNotFound {
        /// Name of the missing index
        name: String,
    },

    /// The storage backend cannot be reached
    #[error("storage unreachable: {message}")]
    Unavailable {
        /// Description of the connectivity failure
        message: String,
    },

    /// Any other storage failure
    #[error("storage error: {message}")]
    Other {
        /// Description of the failure
        message: String,
    },
}

/// Top-level error type for the upload and search entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The uploaded file does not carry the `.txt` extension
    #[error("only .txt files are accepted, got '{file_name}'")]
    UnsupportedExtension {
        /// Name of the rejected file
        file_name: String,
    },

    /// The query contains parameters outside the allow-list
    #[error("unknown query parameter(s): {keys}")]
    UnknownParameters {
        /// Comma-separated offending keys, sorted for determinism
        keys: String,
    },

    /// An id parameter is not a string of digits
    #[error("{name} must be a non-negative integer")]
    InvalidIdParameter {
        /// Name of the offending parameter
        name: &'static str,
    },

    /// A date parameter does not match strict `YYYY-MM-DD`
    #[error("dates must use the YYYY-MM-DD format, got '{value}'")]
    InvalidDateParameter {
        /// The rejected value
        value: String,
    },

    /// Dropping the superseded uniqueness index failed
    ///
    /// The one fatal path in ingestion: the upload aborts before any
    /// batch is written.
    #[error("failed to drop index '{name}': {source}")]
    IndexDrop {
        /// Name of the index that could not be dropped
        name: String,
        /// Underlying storage failure
        source: RepositoryError,
    },

    /// The storage layer is unreachable at startup
    ///
    /// Fatal: the process must not begin accepting work.
    #[error("storage unavailable: {source}")]
    Connectivity {
        /// Underlying storage failure
        source: RepositoryError,
    },

    /// A storage failure on the search path (count or find)
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// I/O failure reading the input file
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O failure
        message: String,
    },
}

impl From<std::io::Error> for OrderError {
    fn from(error: std::io::Error) -> Self {
        OrderError::Io {
            message: error.to_string(),
        }
    }
}

impl OrderError {
    /// Create an UnknownParameters error from the offending keys
    ///
    /// Keys are sorted so the message is deterministic regardless of the
    /// iteration order of the incoming parameter map.
    pub fn unknown_parameters<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut keys: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
        keys.sort_unstable();
        OrderError::UnknownParameters {
            keys: keys.join(", "),
        }
    }

    /// Create an UnsupportedExtension error
    pub fn unsupported_extension(file_name: &str) -> Self {
        OrderError::UnsupportedExtension {
            file_name: file_name.to_string(),
        }
    }
}
