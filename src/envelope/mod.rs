//! Record framing: revision keys and the binary value envelopes
//!
//! Splits a raw (key, value) record into its logical parts:
//! - the bolt key carries an mvcc [`Revision`],
//! - the value is a [`KeyValue`] envelope wrapping the logical key and
//!   stored payload,
//! - a payload starting with [`RESOURCE_MAGIC`] carries an [`Unknown`]
//!   envelope naming the resource's apiVersion and kind.

mod errors;
mod keyvalue;
mod revision;
mod unknown;
mod wire;

pub use errors::{EnvelopeError, EnvelopeResult};
pub use keyvalue::KeyValue;
pub use revision::{Revision, MIN_REVISION_KEY_LEN};
pub use unknown::{has_resource_magic, TypeMeta, Unknown, RESOURCE_MAGIC};
pub use wire::WireReader;
