//! Typed resource shapes known to the registry
//!
//! One module per API group, mirroring how the upstream schema catalog is
//! organized. Shapes validate structure on decode and re-serialize without
//! inventing fields; anything the shape does not model explicitly is either
//! carried as a raw tree or lives in a deep `Value` subtree.

pub mod apps_v1;
pub mod batch;
pub mod core_v1;
pub mod meta;
pub mod networking;
pub mod rbac_v1;

pub use meta::ObjectMeta;
