//! History-driven recommendations.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use shopscout_core::account::AccountGateway;
use shopscout_core::credential::CredentialStore;
use shopscout_core::search::SearchOutcome;

use crate::search_service::SearchOrchestrator;

/// Categories used when the history is empty or unavailable.
const FALLBACK_CATEGORIES: &[&str] = &[
    "electronics",
    "headphones",
    "kitchen gadgets",
    "home decor",
    "fitness gear",
    "books",
    "watches",
    "backpacks",
];

/// Produces a "recommended" result set by replaying a past search term.
///
/// The remote history's bucketed terms are flattened into one pool; when the
/// pool is empty or the fetch fails for any reason, a static category list
/// substitutes unconditionally (no retry). One term is picked uniformly at
/// random and handed to the orchestrator.
pub struct RecommendationService {
    gateway: Arc<dyn AccountGateway>,
    credentials: Arc<dyn CredentialStore>,
    orchestrator: Arc<SearchOrchestrator>,
    rng: Mutex<StdRng>,
}

impl RecommendationService {
    pub fn new(
        gateway: Arc<dyn AccountGateway>,
        credentials: Arc<dyn CredentialStore>,
        orchestrator: Arc<SearchOrchestrator>,
    ) -> Self {
        Self {
            gateway,
            credentials,
            orchestrator,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Pins the term choice for deterministic tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Picks a term and orchestrates a search on it.
    pub async fn recommend(&self) -> SearchOutcome {
        let term = self.pick_term().await;
        debug!(term, "Recommending from sampled term");
        self.orchestrator.search_products(&term).await
    }

    async fn pick_term(&self) -> String {
        let pool = self.term_pool().await;

        let mut rng = self.rng.lock().await;
        pool.choose(&mut *rng)
            .cloned()
            // The static list is non-empty, so the pool always has a term.
            .unwrap_or_else(|| FALLBACK_CATEGORIES[0].to_string())
    }

    async fn term_pool(&self) -> Vec<String> {
        match self.credentials.load().await {
            Ok(Some(credential)) => match self.gateway.fetch_history(&credential).await {
                Ok(history) if !history.is_empty() => history
                    .all_terms()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                Ok(_) => {
                    debug!("History empty, sampling static categories");
                    static_categories()
                }
                Err(err) => {
                    warn!(error = %err, "History fetch failed, sampling static categories");
                    static_categories()
                }
            },
            _ => {
                debug!("Signed out, sampling static categories");
                static_categories()
            }
        }
    }
}

fn static_categories() -> Vec<String> {
    FALLBACK_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shopscout_core::credential::{Credential, StaticCredentialStore};
    use shopscout_core::error::Result;
    use shopscout_core::history::{HistoryEntry, SearchHistory};
    use shopscout_core::product::Product;
    use shopscout_core::provider::SearchProvider;
    use shopscout_core::saved::SavedProduct;

    struct HistoryGateway {
        history: Result<SearchHistory>,
    }

    #[async_trait]
    impl AccountGateway for HistoryGateway {
        async fn fetch_saved(&self, _credential: &Credential) -> Result<Vec<SavedProduct>> {
            Ok(vec![])
        }

        async fn save_product(&self, _credential: &Credential, _product: &Product) -> Result<()> {
            Ok(())
        }

        async fn remove_saved(&self, _credential: &Credential, _product_id: &str) -> Result<()> {
            Ok(())
        }

        async fn clear_saved(&self, _credential: &Credential) -> Result<()> {
            Ok(())
        }

        async fn fetch_history(&self, _credential: &Credential) -> Result<SearchHistory> {
            self.history.clone()
        }

        async fn record_history(&self, _credential: &Credential, _term: &str) -> Result<()> {
            Ok(())
        }

        async fn delete_history(&self, _credential: &Credential, _entry_id: &str) -> Result<()> {
            Ok(())
        }
    }

    /// Provider that records every query it receives.
    #[derive(Default)]
    struct QueryCapture {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for QueryCapture {
        fn name(&self) -> &'static str {
            "capture"
        }

        async fn search(&self, query: &str) -> Vec<Product> {
            self.queries.lock().await.push(query.to_string());
            vec![]
        }
    }

    fn history_of(terms: &[&str]) -> SearchHistory {
        SearchHistory {
            today: terms
                .iter()
                .enumerate()
                .map(|(i, term)| HistoryEntry {
                    id: i.to_string(),
                    term: term.to_string(),
                })
                .collect(),
            ..SearchHistory::default()
        }
    }

    fn build(
        history: Result<SearchHistory>,
        signed_in: bool,
        seed: u64,
    ) -> (RecommendationService, Arc<QueryCapture>) {
        let capture = Arc::new(QueryCapture::default());
        let orchestrator = Arc::new(SearchOrchestrator::new(vec![capture.clone()]));
        let credentials: Arc<dyn CredentialStore> = if signed_in {
            Arc::new(StaticCredentialStore::signed_in("tok", "user-1"))
        } else {
            Arc::new(StaticCredentialStore::signed_out())
        };

        let service = RecommendationService::new(
            Arc::new(HistoryGateway { history }),
            credentials,
            orchestrator,
        )
        .with_seed(seed);
        (service, capture)
    }

    #[tokio::test]
    async fn test_seeded_choice_is_deterministic() {
        let terms = ["earbuds", "keyboard", "monitor"];
        let (first, capture_a) = build(Ok(history_of(&terms)), true, 7);
        let (second, capture_b) = build(Ok(history_of(&terms)), true, 7);

        first.recommend().await;
        second.recommend().await;

        let query_a = capture_a.queries.lock().await[0].clone();
        let query_b = capture_b.queries.lock().await[0].clone();
        assert_eq!(query_a, query_b);
        assert!(terms.contains(&query_a.as_str()));
    }

    #[tokio::test]
    async fn test_empty_history_falls_back_to_categories() {
        let (service, capture) = build(Ok(SearchHistory::default()), true, 3);
        service.recommend().await;

        let query = capture.queries.lock().await[0].clone();
        assert!(FALLBACK_CATEGORIES.contains(&query.as_str()));
    }

    #[tokio::test]
    async fn test_history_failure_falls_back_unconditionally() {
        let (service, capture) = build(
            Err(shopscout_core::ShopscoutError::upstream(
                "account",
                "boom",
            )),
            true,
            3,
        );
        service.recommend().await;

        let query = capture.queries.lock().await[0].clone();
        assert!(FALLBACK_CATEGORIES.contains(&query.as_str()));
    }

    #[tokio::test]
    async fn test_signed_out_samples_categories_without_history_fetch() {
        let (service, capture) = build(Ok(history_of(&["never-used"])), false, 3);
        service.recommend().await;

        let query = capture.queries.lock().await[0].clone();
        assert!(FALLBACK_CATEGORIES.contains(&query.as_str()));
    }
}
