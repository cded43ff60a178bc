//! Detail cache trait and an in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::product::Product;

/// Write-through cache of previously normalized detail records.
///
/// Keyed by provider item identifier. No size bound, no expiry - a permanent
/// local mirror of previously seen items for the life of the session (durable
/// implementations persist across restarts). Populated only after a
/// successful detail fetch, never speculatively.
///
/// There is no single-flight protection: two concurrent fetches for the same
/// uncached id may both hit the network and overwrite each other with the
/// same data. Known redundancy, acceptable.
#[async_trait]
pub trait DetailCacheStore: Send + Sync {
    /// Looks up a cached record; storage failure degrades to a miss.
    async fn get(&self, item_id: &str) -> Result<Option<Product>>;

    /// Stores a freshly normalized record under `item_id`.
    async fn put(&self, item_id: &str, product: &Product) -> Result<()>;
}

/// In-memory cache for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryDetailCache {
    entries: Mutex<HashMap<String, Product>>,
}

impl MemoryDetailCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DetailCacheStore for MemoryDetailCache {
    async fn get(&self, item_id: &str) -> Result<Option<Product>> {
        Ok(self.entries.lock().await.get(item_id).cloned())
    }

    async fn put(&self, item_id: &str, product: &Product) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(item_id.to_string(), product.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_miss_then_hit() {
        let cache = MemoryDetailCache::new();
        assert!(cache.get("B01").await.unwrap().is_none());

        let product = Product::unavailable("B01");
        cache.put("B01", &product).await.unwrap();
        assert_eq!(cache.get("B01").await.unwrap(), Some(product));
    }
}
