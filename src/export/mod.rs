//! Export driver
//!
//! Walks the store's `key` bucket once, in key order, and turns every
//! recognized resource record into one YAML file. Per-record failures are
//! logged and skipped so one malformed record never stops the walk; store
//! and output-target failures abort the run.

mod errors;

pub use errors::{ExportError, ExportResult};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::envelope::{has_resource_magic, KeyValue, Revision, Unknown, RESOURCE_MAGIC};
use crate::registry::Registry;
use crate::render;
use crate::store::Snapshot;

/// Only keys under this namespace carry resources; everything else in the
/// store (leases, raft state, ...) is skipped before any decode attempt
pub const REGISTRY_PREFIX: &str = "/registry/";

/// The bucket etcd's mvcc layer keeps its records in
pub const KEY_BUCKET: &[u8] = b"key";

/// Immutable run configuration, built once from parsed arguments
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Path to the etcd database file
    pub db_path: PathBuf,
    /// Root directory for exported files, created if absent
    pub output_root: PathBuf,
    /// Prefix each document with a `---` marker
    pub doc_separator: bool,
}

/// Outcome counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Records pulled from the bucket
    pub scanned: u64,
    /// Files written
    pub exported: u64,
    /// Records filtered out (namespace, magic, unmatched type)
    pub skipped: u64,
    /// Records dropped by a per-record decode or render failure
    pub failed: u64,
}

/// Runs one full export pass over the store
pub fn run(config: &ExportConfig, registry: &Registry) -> ExportResult<ExportStats> {
    let snapshot = Snapshot::open(&config.db_path)?;
    let bucket = snapshot.bucket(KEY_BUCKET)?;

    let mut stats = ExportStats::default();

    for entry in bucket.iter()? {
        let (bolt_key, value) = entry?;
        stats.scanned += 1;

        let kv = match KeyValue::decode(value) {
            Ok(kv) => kv,
            Err(e) => {
                warn!(error = %e, "skipping record with malformed envelope");
                stats.failed += 1;
                continue;
            }
        };

        let logical_key = String::from_utf8_lossy(&kv.key).into_owned();
        if !logical_key.starts_with(REGISTRY_PREFIX) {
            stats.skipped += 1;
            continue;
        }

        let revision = match Revision::parse(bolt_key) {
            Ok(revision) => revision,
            Err(e) => {
                warn!(key = %logical_key, error = %e, "skipping record with malformed revision key");
                stats.failed += 1;
                continue;
            }
        };

        // Not every registry key carries a typed resource payload; the magic
        // gate filters those silently.
        if !has_resource_magic(&kv.value) {
            stats.skipped += 1;
            continue;
        }

        let unknown = match Unknown::decode(&kv.value[RESOURCE_MAGIC.len()..]) {
            Ok(unknown) => unknown,
            Err(e) => {
                warn!(key = %logical_key, error = %e, "skipping record with malformed resource envelope");
                stats.failed += 1;
                continue;
            }
        };
        let api_version = &unknown.type_meta.api_version;
        let kind = &unknown.type_meta.kind;

        let tree = match registry.decode(api_version, kind, &unknown.raw) {
            None => {
                println!("Unknown {}/{}", api_version, kind);
                stats.skipped += 1;
                continue;
            }
            Some(Err(e)) => {
                warn!(key = %logical_key, api_version, kind, error = %e, "skipping undecodable payload");
                stats.failed += 1;
                continue;
            }
            Some(Ok(tree)) => tree,
        };

        let document = match render_document(config, api_version, kind, &tree) {
            Ok(document) => document,
            Err(e) => {
                warn!(key = %logical_key, error = %e, "skipping unrenderable record");
                stats.failed += 1;
                continue;
            }
        };

        // Output failures invalidate the rest of the run; abort.
        let path = output_path(&config.output_root, &logical_key, revision);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, document).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote resource");
        stats.exported += 1;
    }

    Ok(stats)
}

/// Derives the output path for one record: the logical key becomes the
/// directory hierarchy and the revision suffix keeps distinct revisions of
/// the same key in distinct files
pub fn output_path(output_root: &Path, logical_key: &str, revision: Revision) -> PathBuf {
    let relative = logical_key.trim_start_matches('/');
    output_root.join(format!(
        "{}-{}-{}.yaml",
        relative, revision.main, revision.sub
    ))
}

fn render_document(
    config: &ExportConfig,
    api_version: &str,
    kind: &str,
    tree: &serde_json::Value,
) -> render::RenderResult<String> {
    let header = render::type_header(api_version, kind)?;
    let body = render::to_canonical_yaml(tree)?;

    let mut document = String::with_capacity(4 + header.len() + body.len());
    if config.doc_separator {
        document.push_str("---\n");
    }
    document.push_str(&header);
    document.push_str(&body);
    Ok(document)
}
