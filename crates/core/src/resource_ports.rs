//! Per-resource store port.

use std::collections::HashSet;

use async_trait::async_trait;
use metarp_domain::{EdgeDevice, Result};

/// Capability interface for edge device resources.
///
/// Two independent implementations exist: the network-backed proxy client and
/// the cache-backed test store. Callers pick one at their composition root;
/// there is no inheritance relationship between the two.
#[async_trait]
pub trait EdgeDeviceStore: Send + Sync {
    /// Fetch a single edge device by resource id.
    ///
    /// An absent resource is `Ok(None)`, never an error. The id comparison is
    /// backend-defined but at least case-insensitive for the cache backend.
    async fn get_edge_device(
        &self,
        tenant_id: Option<&str>,
        resource_id: &str,
    ) -> Result<Option<EdgeDevice>>;

    /// Fetch the subset of `resource_ids` that exist.
    ///
    /// Returns `Ok(None)` when the backend holds no collection at all, and
    /// `Ok(Some(..))` (possibly empty) otherwise.
    async fn get_edge_devices_batch(
        &self,
        tenant_id: Option<&str>,
        resource_ids: &HashSet<String>,
    ) -> Result<Option<Vec<EdgeDevice>>>;

    /// Store one edge device.
    async fn put_edge_device(&self, tenant_id: Option<&str>, device: &EdgeDevice) -> Result<()>;
}
