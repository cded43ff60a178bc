//! File-backed detail cache, one cached item = one file.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── cache/
//!     ├── B0C1EXAMPLE.json
//!     └── slug-wireless-earbuds.json
//! ```
//!
//! No size bound, no expiry: previously fetched detail records stay available
//! across restarts until the platform clears app data. A read failure is a
//! cache miss, never an error surfaced to the fetch path.

use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

use shopscout_core::cache::DetailCacheStore;
use shopscout_core::error::Result;
use shopscout_core::product::Product;

use crate::paths::ShopscoutPaths;
use crate::storage::JsonDirStorage;

/// Durable write-through cache for detail records.
pub struct FileDetailCache {
    storage: JsonDirStorage,
}

impl FileDetailCache {
    /// Creates a cache at the default location.
    pub async fn default_location() -> Result<Self> {
        let dir = ShopscoutPaths::cache_dir()
            .map_err(|e| shopscout_core::ShopscoutError::config(e.to_string()))?;
        Self::new(&dir).await
    }

    /// Creates a cache under a custom directory (for testing).
    pub async fn new(base_dir: &Path) -> Result<Self> {
        let storage = JsonDirStorage::new(base_dir)
            .await
            .map_err(shopscout_core::ShopscoutError::from)?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl DetailCacheStore for FileDetailCache {
    async fn get(&self, item_id: &str) -> Result<Option<Product>> {
        match self.storage.load::<Product>(item_id).await {
            Ok(cached) => Ok(cached),
            Err(e) => {
                warn!(item_id, error = %e, "Detail cache read failed, treating as miss");
                Ok(None)
            }
        }
    }

    async fn put(&self, item_id: &str, product: &Product) -> Result<()> {
        self.storage
            .save(item_id, product)
            .await
            .map_err(shopscout_core::ShopscoutError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_miss_then_write_through_then_hit() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileDetailCache::new(temp_dir.path()).await.unwrap();

        assert!(cache.get("B000TEST01").await.unwrap().is_none());

        let product = Product::unavailable("B000TEST01");
        cache.put("B000TEST01", &product).await.unwrap();

        let cached = cache.get("B000TEST01").await.unwrap();
        assert_eq!(cached, Some(product));
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let product = Product::unavailable("B000TEST01");

        {
            let cache = FileDetailCache::new(temp_dir.path()).await.unwrap();
            cache.put("B000TEST01", &product).await.unwrap();
        }

        let cache = FileDetailCache::new(temp_dir.path()).await.unwrap();
        assert_eq!(cache.get("B000TEST01").await.unwrap(), Some(product));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileDetailCache::new(temp_dir.path()).await.unwrap();

        std::fs::write(temp_dir.path().join("B000TEST01.json"), "{ broken").unwrap();

        assert!(cache.get("B000TEST01").await.unwrap().is_none());
    }
}
