//! Per-item detail resolution with a write-through cache.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use shopscout_core::cache::DetailCacheStore;
use shopscout_core::product::Product;
use shopscout_core::provider::{DetailProvider, SearchProvider};

/// Resolves one item identifier to a full `Product`, never failing to
/// produce *a* product.
///
/// Resolution order, short-circuiting on first success:
/// 1. Cache hit (no network call)
/// 2. Primary detail endpoint, write-through to cache
/// 3. On a rate-limit condition only: the secondary provider's
///    search-by-identifier as a substitute lookup, write-through to cache
/// 4. A placeholder record - never cached, so a later attempt retries the
///    real providers
///
/// There is no single-flight protection: two concurrent fetches for the same
/// uncached id may both hit the network. The cache ends up with the same
/// data either way.
pub struct DetailFetcher {
    cache: Arc<dyn DetailCacheStore>,
    primary: Arc<dyn DetailProvider>,
    fallback: Arc<dyn SearchProvider>,
}

impl DetailFetcher {
    pub fn new(
        cache: Arc<dyn DetailCacheStore>,
        primary: Arc<dyn DetailProvider>,
        fallback: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            cache,
            primary,
            fallback,
        }
    }

    /// Resolves `item_id` to a product, consulting the cache first.
    pub async fn fetch_detail(&self, item_id: &str) -> Product {
        match self.cache.get(item_id).await {
            Ok(Some(cached)) => {
                debug!(item_id, "Detail cache hit");
                return cached;
            }
            Ok(None) => {}
            Err(err) => warn!(item_id, error = %err, "Detail cache read failed"),
        }

        match self.primary.fetch_detail(item_id).await {
            Ok(product) => {
                self.write_through(item_id, &product).await;
                return product;
            }
            Err(err) if err.is_rate_limited() => {
                warn!(
                    item_id,
                    provider = err.provider(),
                    "Detail endpoint rate limited, substituting search-by-identifier"
                );
                if let Some(product) = self.search_fallback(item_id).await {
                    self.write_through(item_id, &product).await;
                    return product;
                }
            }
            Err(err) => {
                warn!(item_id, error = %err, "Detail fetch failed");
            }
        }

        debug!(item_id, "All detail paths failed, returning placeholder");
        Product::unavailable(item_id)
    }

    /// Resolves a batch of identifiers concurrently.
    ///
    /// Each id is an independent task; a failure in one never cancels or
    /// affects the others. Results are collected positionally.
    pub async fn fetch_details(&self, item_ids: &[String]) -> Vec<Product> {
        join_all(item_ids.iter().map(|id| self.fetch_detail(id))).await
    }

    /// Substitute lookup via the secondary provider's search, preferring an
    /// exact id match over the first result.
    async fn search_fallback(&self, item_id: &str) -> Option<Product> {
        let mut results = self.fallback.search(item_id).await;
        if results.is_empty() {
            warn!(item_id, "Substitute lookup returned nothing");
            return None;
        }

        let index = results
            .iter()
            .position(|product| product.id == item_id)
            .unwrap_or(0);
        Some(results.swap_remove(index))
    }

    async fn write_through(&self, item_id: &str, product: &Product) {
        if let Err(err) = self.cache.put(item_id, product).await {
            warn!(item_id, error = %err, "Detail cache write failed");
        }
    }
}
