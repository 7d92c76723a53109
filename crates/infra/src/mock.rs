//! Cache-backed edge device store.
//!
//! Second implementation of the [`EdgeDeviceStore`] capability, used to
//! exercise callers without a live proxy. The whole collection lives as one
//! serialized value under a single cache key, so concurrent seed/put/clear
//! calls race last-write-wins - acceptable for a test fixture.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use metarp_core::{EdgeDeviceStore, StringCache, TelemetryLevel, TelemetrySink};
use metarp_domain::{EdgeDevice, ErrorCode, ResponseError, Result};

/// Cache key holding the serialized edge device collection.
const EDGE_DEVICES_KEY: &str = "EdgeDevices";

pub struct CachedEdgeDeviceStore {
    cache: Arc<dyn StringCache>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl CachedEdgeDeviceStore {
    pub fn new(cache: Arc<dyn StringCache>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self { cache, telemetry }
    }

    /// Replace the stored collection wholesale.
    pub async fn seed(&self, devices: &[EdgeDevice]) -> Result<()> {
        let data = serde_json::to_string(devices).map_err(|e| {
            ResponseError::new(
                500,
                ErrorCode::SerializationError,
                "edge device collection could not be serialized for seeding",
            )
            .with_target(EDGE_DEVICES_KEY)
            .with_cause(e)
        })?;

        self.telemetry.record(
            TelemetryLevel::Info,
            "seeding edge device data in cache",
            &[("count", devices.len().to_string())],
        );
        self.cache.set_string(EDGE_DEVICES_KEY, &data).await
    }

    /// Remove the stored collection.
    pub async fn clear(&self) -> Result<()> {
        self.cache.remove(EDGE_DEVICES_KEY).await
    }

    /// Load the stored collection. An absent key, an empty string and a bare
    /// `[]` all count as "no collection".
    async fn stored_devices(&self) -> Result<Option<Vec<EdgeDevice>>> {
        let serialized = self.cache.get_string(EDGE_DEVICES_KEY).await?;
        match serialized.as_deref() {
            None | Some("") | Some("[]") => Ok(None),
            Some(data) => serde_json::from_str(data).map(Some).map_err(|e| {
                ResponseError::new(
                    500,
                    ErrorCode::SerializationError,
                    "cached edge device collection could not be decoded",
                )
                .with_target(EDGE_DEVICES_KEY)
                .with_cause(e)
            }),
        }
    }
}

#[async_trait]
impl EdgeDeviceStore for CachedEdgeDeviceStore {
    async fn get_edge_device(
        &self,
        _tenant_id: Option<&str>,
        resource_id: &str,
    ) -> Result<Option<EdgeDevice>> {
        let devices = self.stored_devices().await?;
        Ok(devices.and_then(|list| {
            list.into_iter().find(|device| device.id.eq_ignore_ascii_case(resource_id))
        }))
    }

    async fn get_edge_devices_batch(
        &self,
        _tenant_id: Option<&str>,
        resource_ids: &HashSet<String>,
    ) -> Result<Option<Vec<EdgeDevice>>> {
        // Storage order is preserved; membership is exact, matching the
        // batch contract of the live backend.
        Ok(self.stored_devices().await?.map(|list| {
            list.into_iter().filter(|device| resource_ids.contains(&device.id)).collect()
        }))
    }

    /// A put only succeeds when the incoming value serializes identically to
    /// an entry already in the cache. This store echoes known state rather
    /// than merging new state, so an unknown payload is a
    /// [`ErrorCode::ValidationFailed`] and the collection stays untouched.
    async fn put_edge_device(&self, _tenant_id: Option<&str>, device: &EdgeDevice) -> Result<()> {
        let devices = self.stored_devices().await?.unwrap_or_default();
        let incoming = serialize_device(device)?;

        for existing in &devices {
            if serialize_device(existing)? == incoming {
                return Ok(());
            }
        }

        self.telemetry.record(
            TelemetryLevel::Warn,
            "rejecting edge device payload not present in cache",
            &[("resourceId", device.id.clone())],
        );
        Err(ResponseError::new(
            400,
            ErrorCode::ValidationFailed,
            "the edge device payload does not match any cached entry",
        )
        .with_target(EDGE_DEVICES_KEY))
    }
}

fn serialize_device(device: &EdgeDevice) -> Result<String> {
    serde_json::to_string(device).map_err(|e| {
        ResponseError::new(
            500,
            ErrorCode::SerializationError,
            format!("edge device {} could not be serialized", device.id),
        )
        .with_cause(e)
    })
}
