//! Registry error types
//!
//! A registry lookup miss is not an error (the caller reports the unmatched
//! pair and moves on). Only a payload that fails to parse against its
//! matched shape produces an error, and that error is per-record fatal.

use thiserror::Error;

/// A payload matched a registry entry but did not parse against its shape
#[derive(Debug, Error)]
#[error("payload does not parse against the registered shape: {0}")]
pub struct PayloadError(#[from] serde_json::Error);
