//! Tests for the cache-backed edge device store through the shared
//! capability trait, the way a composition root would consume it.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use metarp_core::{EdgeDeviceStore, StringCache, TelemetryLevel};
use metarp_domain::{EdgeDevice, ErrorCode};
use metarp_infra::{CachedEdgeDeviceStore, InMemoryCache};
use support::RecordingTelemetry;

fn device(id: &str, name: &str) -> EdgeDevice {
    EdgeDevice {
        id: id.to_string(),
        name: Some(name.to_string()),
        resource_type: Some("Microsoft.AzureStackHCI/edgeDevices".to_string()),
        properties: Some(serde_json::json!({"provisioningState": "Succeeded"})),
    }
}

fn store() -> (CachedEdgeDeviceStore, Arc<RecordingTelemetry>) {
    let telemetry = RecordingTelemetry::new();
    let cache: Arc<dyn StringCache> = Arc::new(InMemoryCache::new());
    (CachedEdgeDeviceStore::new(cache, telemetry.clone()), telemetry)
}

#[tokio::test]
async fn behaves_as_edge_device_store_capability() {
    let (store, _telemetry) = store();
    store.seed(&[device("d1", "first"), device("d2", "second")]).await.unwrap();

    // Exercise through the trait object, as callers would.
    let backend: &dyn EdgeDeviceStore = &store;

    let found = backend.get_edge_device(Some("tenant-1"), "D1").await.unwrap();
    assert_eq!(found.expect("lookup is case-insensitive").name.as_deref(), Some("first"));

    let ids: HashSet<String> = ["d2".to_string(), "d9".to_string()].into_iter().collect();
    let batch = backend.get_edge_devices_batch(None, &ids).await.unwrap().unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].id, "d2");
}

#[tokio::test]
async fn put_echoes_known_state_and_rejects_unknown_state() {
    let (store, telemetry) = store();
    let known = device("d1", "first");
    store.seed(std::slice::from_ref(&known)).await.unwrap();

    store.put_edge_device(None, &known).await.expect("identical payload is accepted");

    let unknown = device("d1", "tampered");
    let err = store.put_edge_device(None, &unknown).await.unwrap_err();
    assert_eq!(err.error_code, ErrorCode::ValidationFailed);
    assert!(telemetry.contains(TelemetryLevel::Warn, "rejecting edge device payload"));
}

#[tokio::test]
async fn clear_resets_to_no_collection() {
    let (store, _telemetry) = store();
    store.seed(&[device("d1", "first")]).await.unwrap();
    store.clear().await.unwrap();

    let ids: HashSet<String> = ["d1".to_string()].into_iter().collect();
    assert!(store.get_edge_devices_batch(None, &ids).await.unwrap().is_none());
}
