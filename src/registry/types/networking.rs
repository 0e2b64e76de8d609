//! Ingress shape
//!
//! `extensions/v1beta1` and `networking.k8s.io/v1beta1` describe the same
//! object; the registry registers this one shape under both keys. The keys
//! stay distinct entries, only the decoder is shared.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::ObjectMeta;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<IngressSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingress_rules_pass_through() {
        let ingress: Ingress = serde_json::from_str(
            r#"{"metadata":{"name":"web"},"spec":{"rules":[{"host":"example.com","http":{"paths":[{"path":"/"}]}}]}}"#,
        )
        .unwrap();
        let round = serde_json::to_value(&ingress).unwrap();
        assert_eq!(round["spec"]["rules"][0]["host"], "example.com");
    }
}
