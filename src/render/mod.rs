//! Canonical YAML rendering
//!
//! Every decoded value is lowered to a generic tree first and serialized
//! from there. The tree's objects are `serde_json`'s default map (a
//! `BTreeMap`), so keys come out sorted and re-running the export over an
//! unchanged store reproduces every file byte for byte. No timestamps, no
//! iteration-order dependence.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for rendering
pub type RenderResult<T> = Result<T, RenderError>;

/// Renderer-internal failures; per-record fatal, never expected for values
/// produced by the registry decoders
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to lower value to a tree: {0}")]
    Tree(#[from] serde_json::Error),
    #[error("failed to serialize tree as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Lowers any serializable value to the generic ordered-key tree
pub fn to_tree<T: Serialize>(value: &T) -> RenderResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Serializes a tree as canonical YAML (sorted keys, two-space indent)
pub fn to_canonical_yaml(tree: &Value) -> RenderResult<String> {
    Ok(serde_yaml::to_string(tree)?)
}

/// Renders the type-identity header: just apiVersion and kind, in the same
/// canonical form as the body
pub fn type_header(api_version: &str, kind: &str) -> RenderResult<String> {
    to_canonical_yaml(&json!({
        "apiVersion": api_version,
        "kind": kind,
    }))
}
