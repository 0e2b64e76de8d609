//! Export error types
//!
//! Only run-fatal conditions live here: a store that will not open or
//! iterate, and an output target that will not accept writes. Per-record
//! decode and render failures are isolated inside the driver loop and
//! never become an `ExportError`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Result type for the export run
pub type ExportResult<T> = Result<T, ExportError>;

/// Run-fatal export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// The database failed to open or iterate
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An output directory could not be created
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
