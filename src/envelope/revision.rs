//! Revision key parsing
//!
//! etcd's mvcc layer keys every bolt record by its revision:
//!
//! ```text
//! +---------------+
//! | Main Revision | (8 bytes, big-endian)
//! +---------------+
//! | Separator     | (1 byte, ignored)
//! +---------------+
//! | Sub Revision  | (8 bytes, big-endian)
//! +---------------+
//! ```
//!
//! The pair totally orders record versions within the store. The exporter
//! only uses it to disambiguate output filenames, so the separator byte's
//! value is never validated.

use super::errors::{EnvelopeError, EnvelopeResult};

/// Minimum key width: main + separator + sub
pub const MIN_REVISION_KEY_LEN: usize = 17;

/// An mvcc revision identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Revision {
    pub main: i64,
    pub sub: i64,
}

impl Revision {
    /// Parses a revision from a bolt key. Pure; identical bytes always
    /// yield identical revisions.
    pub fn parse(key: &[u8]) -> EnvelopeResult<Self> {
        if key.len() < MIN_REVISION_KEY_LEN {
            return Err(EnvelopeError::ShortKey(key.len()));
        }
        Ok(Self {
            main: i64::from_be_bytes(key[0..8].try_into().unwrap()),
            sub: i64::from_be_bytes(key[9..17].try_into().unwrap()),
        })
    }
}
