//! k8s-export - offline exporter for Kubernetes state stored in etcd
//!
//! Opens an etcd member's bbolt database file read-only, walks every record
//! in the mvcc `key` bucket, decodes the envelopes around each stored
//! resource, and writes one canonical YAML file per recognized record.

pub mod cli;
pub mod envelope;
pub mod export;
pub mod registry;
pub mod render;
pub mod store;
