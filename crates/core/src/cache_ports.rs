//! String cache boundary used by the cache-backed test store.

use async_trait::async_trait;
use metarp_domain::Result;

/// Minimal key/value string cache.
///
/// Implemented outside this crate (in-memory for tests, a distributed cache
/// in deployments). The test store keeps one serialized collection under a
/// single key; concurrent writers race last-write-wins by design.
#[async_trait]
pub trait StringCache: Send + Sync {
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
