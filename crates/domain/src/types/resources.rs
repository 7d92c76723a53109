//! Cluster and edge device resource models.
//!
//! These are schema-mapped ARM payloads; the client only relies on `id` for
//! identity and on a faithful JSON round-trip (camelCase names, nulls
//! omitted, unknown fields ignored). Everything under `properties` stays
//! opaque.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An Azure Stack HCI cluster resource as surfaced by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

/// A page of clusters plus the cursor to the next page.
///
/// An explicit empty page (no clusters, no cursor) is how "nothing exists
/// yet" is reported for the collection-page operation; absence is never
/// signalled by an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPage {
    pub clusters: Vec<Cluster>,
    pub next_link: Option<String>,
}

impl ClusterPage {
    pub fn empty() -> Self {
        Self { clusters: Vec::new(), next_link: None }
    }
}

/// An edge device resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDevice {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

/// Delete-target descriptor posted to the admin delete endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDeleteResource {
    pub resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl AdminDeleteResource {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self { resource_id: resource_id.into(), resource_type: None, api_version: None }
    }
}

impl fmt::Display for AdminDeleteResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_round_trips_camel_case() {
        let cluster = Cluster {
            id: "/subscriptions/s1/providers/Microsoft.AzureStackHCI/clusters/c1".to_string(),
            name: Some("c1".to_string()),
            resource_type: Some("Microsoft.AzureStackHCI/clusters".to_string()),
            location: Some("westus".to_string()),
            properties: Some(serde_json::json!({"status": "Connected"})),
        };

        let encoded = serde_json::to_string(&cluster).unwrap();
        assert!(encoded.contains(r#""type":"Microsoft.AzureStackHCI/clusters""#));
        let decoded: Cluster = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, cluster);
    }

    #[test]
    fn null_fields_are_omitted_on_write() {
        let device = EdgeDevice {
            id: "d1".to_string(),
            name: None,
            resource_type: None,
            properties: None,
        };
        assert_eq!(serde_json::to_string(&device).unwrap(), r#"{"id":"d1"}"#);
    }

    #[test]
    fn unknown_fields_are_ignored_on_read() {
        let body = r#"{"id":"c1","somethingNew":true}"#;
        let cluster: Cluster = serde_json::from_str(body).unwrap();
        assert_eq!(cluster.id, "c1");
        assert!(cluster.properties.is_none());
    }

    #[test]
    fn delete_resource_serializes_camel_case_without_nulls() {
        let resource = AdminDeleteResource::new("/subscriptions/s1/resourceGroups/rg/x");
        let encoded = serde_json::to_string(&resource).unwrap();
        assert_eq!(encoded, r#"{"resourceId":"/subscriptions/s1/resourceGroups/rg/x"}"#);
    }
}
