//! Envelope error types
//!
//! All of these are per-record fatal: the record is reported and skipped,
//! the walk continues. Malformed bytes are deterministic, so nothing here
//! is ever retried.

use thiserror::Error;

/// Result type for envelope decoding
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Errors raised while decoding a record's key or value framing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The bolt key is too short to carry a revision
    #[error("key too short for a revision: {0} bytes, need at least 17")]
    ShortKey(usize),

    /// The buffer ended inside a field
    #[error("truncated message at byte {0}")]
    Truncated(usize),

    /// A varint ran past 10 bytes or overflowed 64 bits
    #[error("varint overflow at byte {0}")]
    VarintOverflow(usize),

    /// A field tag decoded to field number zero
    #[error("invalid field tag at byte {0}")]
    InvalidTag(usize),

    /// A known field carried an unexpected wire type, or an unknown field
    /// carried a wire type that cannot be skipped
    #[error("field {field} has unsupported wire type {wire_type} at byte {offset}")]
    UnsupportedWireType {
        field: u32,
        wire_type: u8,
        offset: usize,
    },

    /// A string field held invalid UTF-8
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),
}
