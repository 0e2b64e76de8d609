//! Type registry and dispatcher
//!
//! Maps an exact `(apiVersion, kind)` pair to the decoder for that resource
//! shape. The table is built once at startup and never mutated afterwards;
//! dispatch is a single hash lookup, so the catalog grows by adding entries,
//! never by adding branches. Version strings are distinct keys: `apps/v1`
//! and `extensions/v1beta1` are unrelated entries even where kinds overlap.

mod errors;
pub mod types;

pub use errors::PayloadError;

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use types::{apps_v1, batch, core_v1, networking, rbac_v1};

/// Decodes a raw payload into a generic ordered-key tree
pub type DecodeFn = fn(&[u8]) -> Result<Value, PayloadError>;

/// The static decoder table, keyed by `"{apiVersion}/{kind}"`
pub struct Registry {
    entries: HashMap<String, DecodeFn>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The full default catalog
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.insert("v1", "ConfigMap", decode_json::<core_v1::ConfigMap>);
        registry.insert("v1", "Namespace", decode_json::<core_v1::Namespace>);
        registry.insert("v1", "Secret", decode_json::<core_v1::Secret>);
        registry.insert("v1", "Service", decode_json::<core_v1::Service>);
        registry.insert("v1", "ServiceAccount", decode_json::<core_v1::ServiceAccount>);
        registry.insert(
            "v1",
            "PersistentVolume",
            decode_json::<core_v1::PersistentVolume>,
        );
        registry.insert(
            "v1",
            "PersistentVolumeClaim",
            decode_json::<core_v1::PersistentVolumeClaim>,
        );

        registry.insert("apps/v1", "Deployment", decode_json::<apps_v1::Deployment>);
        registry.insert("apps/v1", "DaemonSet", decode_json::<apps_v1::DaemonSet>);
        registry.insert("apps/v1", "StatefulSet", decode_json::<apps_v1::StatefulSet>);

        registry.insert("batch/v1", "Job", decode_json::<batch::Job>);
        registry.insert("batch/v1beta1", "CronJob", decode_json::<batch::CronJob>);

        registry.insert(
            "extensions/v1beta1",
            "Ingress",
            decode_json::<networking::Ingress>,
        );
        registry.insert(
            "networking.k8s.io/v1beta1",
            "Ingress",
            decode_json::<networking::Ingress>,
        );

        registry.insert(
            "rbac.authorization.k8s.io/v1",
            "Role",
            decode_json::<rbac_v1::Role>,
        );
        registry.insert(
            "rbac.authorization.k8s.io/v1",
            "RoleBinding",
            decode_json::<rbac_v1::RoleBinding>,
        );
        registry.insert(
            "rbac.authorization.k8s.io/v1",
            "ClusterRole",
            decode_json::<rbac_v1::ClusterRole>,
        );
        registry.insert(
            "rbac.authorization.k8s.io/v1",
            "ClusterRoleBinding",
            decode_json::<rbac_v1::ClusterRoleBinding>,
        );

        registry
    }

    /// Registers a decoder for one exact (apiVersion, kind) pair
    pub fn insert(&mut self, api_version: &str, kind: &str, decode: DecodeFn) {
        self.entries.insert(registry_key(api_version, kind), decode);
    }

    pub fn contains(&self, api_version: &str, kind: &str) -> bool {
        self.entries.contains_key(&registry_key(api_version, kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dispatches a payload to its decoder.
    ///
    /// `None` means no entry matched (not an error; the caller reports the
    /// pair and skips). `Some(Err)` means the payload failed its shape.
    pub fn decode(
        &self,
        api_version: &str,
        kind: &str,
        raw: &[u8],
    ) -> Option<Result<Value, PayloadError>> {
        self.entries
            .get(&registry_key(api_version, kind))
            .map(|decode| decode(raw))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn registry_key(api_version: &str, kind: &str) -> String {
    format!("{}/{}", api_version, kind)
}

/// Shape-checks a JSON payload against `T`, then lowers it back to a tree
fn decode_json<T: DeserializeOwned + Serialize>(raw: &[u8]) -> Result<Value, PayloadError> {
    let typed: T = serde_json::from_slice(raw)?;
    Ok(serde_json::to_value(typed)?)
}
