//! In-memory string cache.

use std::collections::HashMap;

use async_trait::async_trait;
use metarp_core::StringCache;
use metarp_domain::Result;
use parking_lot::Mutex;

/// Process-local [`StringCache`] backed by a mutex-guarded map.
///
/// Used by the cache-backed test store; deployments substitute a distributed
/// cache behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StringCache for InMemoryCache {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove_round_trip() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get_string("k").await.unwrap(), None);

        cache.set_string("k", "v1").await.unwrap();
        assert_eq!(cache.get_string("k").await.unwrap().as_deref(), Some("v1"));

        cache.set_string("k", "v2").await.unwrap();
        assert_eq!(cache.get_string("k").await.unwrap().as_deref(), Some("v2"));

        cache.remove("k").await.unwrap();
        assert_eq!(cache.get_string("k").await.unwrap(), None);
    }
}
