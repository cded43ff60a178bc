//! Local mirror store for the saved-products collection.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::saved::SavedProduct;

/// Durable local mirror of the saved-products collection.
///
/// The remote account store is authoritative when reachable; this mirror is
/// the sole source of truth when it is not. Constructed once per session and
/// passed by handle to every component that needs it, so tests can substitute
/// an in-memory fake.
#[async_trait]
pub trait SavedMirrorStore: Send + Sync {
    /// Returns the mirrored collection; storage failure degrades to empty.
    async fn load(&self) -> Result<Vec<SavedProduct>>;

    /// Overwrites the mirror entirely (remote reconciliation).
    async fn replace_all(&self, items: &[SavedProduct]) -> Result<()>;

    /// Adds or replaces one entry, keyed by product id.
    async fn upsert(&self, item: SavedProduct) -> Result<()>;

    /// Removes the entry for `product_id` if present.
    async fn remove(&self, product_id: &str) -> Result<()>;

    /// Empties the mirror.
    async fn clear(&self) -> Result<()>;
}

/// In-memory mirror for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySavedMirror {
    items: Mutex<Vec<SavedProduct>>,
}

impl MemorySavedMirror {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedMirrorStore for MemorySavedMirror {
    async fn load(&self) -> Result<Vec<SavedProduct>> {
        Ok(self.items.lock().await.clone())
    }

    async fn replace_all(&self, items: &[SavedProduct]) -> Result<()> {
        *self.items.lock().await = items.to_vec();
        Ok(())
    }

    async fn upsert(&self, item: SavedProduct) -> Result<()> {
        let mut items = self.items.lock().await;
        items.retain(|existing| existing.product_id != item.product_id);
        items.push(item);
        Ok(())
    }

    async fn remove(&self, product_id: &str) -> Result<()> {
        self.items
            .lock()
            .await
            .retain(|existing| existing.product_id != product_id);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.items.lock().await.clear();
        Ok(())
    }
}
