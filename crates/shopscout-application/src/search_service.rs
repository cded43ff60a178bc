//! Search orchestration across the upstream providers.

use std::sync::Arc;
use tracing::debug;

use shopscout_core::provider::SearchProvider;
use shopscout_core::search::SearchOutcome;

/// Queries the providers in fixed priority order, stopping at the first
/// provider that returns a non-empty result set.
///
/// Provider priority never depends on the query and is never randomized:
/// the aggregator is consulted first, the marketplace provider second. An
/// all-empty sweep is a reported condition, not an error - the outcome
/// carries a templated notice next to the empty list. No retries happen
/// here; a caller-initiated retry re-invokes the whole orchestration.
pub struct SearchOrchestrator {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl SearchOrchestrator {
    /// Creates an orchestrator over `providers`, highest priority first.
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    /// Resolves a free-text query to a result set.
    ///
    /// The query must be non-empty after trimming; callers trim before
    /// invoking.
    pub async fn search_products(&self, query: &str) -> SearchOutcome {
        for provider in &self.providers {
            let products = provider.search(query).await;
            if !products.is_empty() {
                debug!(
                    provider = provider.name(),
                    query,
                    count = products.len(),
                    "Search resolved"
                );
                return SearchOutcome::found(products);
            }
            debug!(
                provider = provider.name(),
                query, "Provider returned no results, trying next"
            );
        }

        debug!(query, "No provider had results");
        SearchOutcome::none_for(query)
    }
}
