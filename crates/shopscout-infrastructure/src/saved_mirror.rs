//! File-backed local mirror of the saved-products collection.
//!
//! One JSON document holds the whole collection. The remote account store is
//! authoritative when reachable; this mirror carries the collection through
//! outages and across restarts. A read failure degrades to an empty
//! collection, matching the "no mirrored data" error policy.

use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

use shopscout_core::error::Result;
use shopscout_core::saved::{SavedMirrorStore, SavedProduct};

use crate::paths::ShopscoutPaths;
use crate::storage::JsonDirStorage;

const MIRROR_KEY: &str = "saved_products";

/// Durable saved-products mirror.
pub struct FileSavedMirror {
    storage: JsonDirStorage,
}

impl FileSavedMirror {
    /// Creates a mirror at the default location.
    pub async fn default_location() -> Result<Self> {
        let dir = ShopscoutPaths::store_dir()
            .map_err(|e| shopscout_core::ShopscoutError::config(e.to_string()))?;
        Self::new(&dir).await
    }

    /// Creates a mirror under a custom directory (for testing).
    pub async fn new(base_dir: &Path) -> Result<Self> {
        let storage = JsonDirStorage::new(base_dir)
            .await
            .map_err(shopscout_core::ShopscoutError::from)?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl SavedMirrorStore for FileSavedMirror {
    async fn load(&self) -> Result<Vec<SavedProduct>> {
        match self.storage.load::<Vec<SavedProduct>>(MIRROR_KEY).await {
            Ok(Some(items)) => Ok(items),
            Ok(None) => Ok(Vec::new()),
            Err(e) => {
                warn!(error = %e, "Saved mirror read failed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn replace_all(&self, items: &[SavedProduct]) -> Result<()> {
        self.storage
            .save(MIRROR_KEY, &items)
            .await
            .map_err(shopscout_core::ShopscoutError::from)
    }

    async fn upsert(&self, item: SavedProduct) -> Result<()> {
        let mut items = self.load().await?;
        items.retain(|existing| existing.product_id != item.product_id);
        items.push(item);
        self.replace_all(&items).await
    }

    async fn remove(&self, product_id: &str) -> Result<()> {
        let mut items = self.load().await?;
        items.retain(|existing| existing.product_id != product_id);
        self.replace_all(&items).await
    }

    async fn clear(&self) -> Result<()> {
        self.replace_all(&[]).await
    }
}
