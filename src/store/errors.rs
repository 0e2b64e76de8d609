//! Store error types
//!
//! Every store error is fatal for the whole run: the database either opens
//! and iterates cleanly or the export aborts. Per-record problems are not
//! store errors; they belong to the envelope and registry layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while opening or iterating a bbolt database file
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be read
    #[error("failed to read database file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a bbolt database (bad magic, version, or meta checksum)
    #[error("not a valid bbolt database: {0}")]
    InvalidDatabase(String),

    /// A page reference or element offset points outside the file
    #[error("corrupt database page {pgid}: {reason}")]
    Corrupt { pgid: u64, reason: String },

    /// The requested bucket does not exist in the root bucket
    #[error("bucket {0:?} not found")]
    BucketNotFound(String),
}

impl StoreError {
    /// Corruption error with page context
    pub fn corrupt(pgid: u64, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            pgid,
            reason: reason.into(),
        }
    }
}
