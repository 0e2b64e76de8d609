//! CLI-specific error types
//!
//! Everything here is fatal: either the arguments are unusable before any
//! I/O happens, or the export run itself aborted.

use thiserror::Error;

use crate::export::ExportError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// Fatal CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// One or both required path arguments are missing
    #[error("both --db and --output are required")]
    MissingArguments,

    /// The export run aborted
    #[error(transparent)]
    Export(#[from] ExportError),
}
