//! End-to-end scenarios over the assembled services with scripted
//! providers, covering the user-visible flows: search resolution, the
//! no-results notice, and the detail fallback-then-cache path.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shopscout_application::{DetailFetcher, SearchOrchestrator};
use shopscout_core::cache::MemoryDetailCache;
use shopscout_core::product::Product;
use shopscout_core::provider::{DetailProvider, ProviderError, SearchProvider};

struct ScriptedSearch {
    name: &'static str,
    results: Vec<Product>,
    calls: AtomicUsize,
}

impl ScriptedSearch {
    fn new(name: &'static str, results: Vec<Product>) -> Arc<Self> {
        Arc::new(Self {
            name,
            results,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _query: &str) -> Vec<Product> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.clone()
    }
}

struct RateLimitedDetail {
    calls: AtomicUsize,
}

impl RateLimitedDetail {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetailProvider for RateLimitedDetail {
    fn name(&self) -> &'static str {
        "marketplace"
    }

    async fn fetch_detail(&self, _item_id: &str) -> Result<Product, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::RateLimited {
            provider: "marketplace",
            retry_after: None,
        })
    }
}

fn product(id: &str, title: &str) -> Product {
    Product {
        id: id.to_string(),
        title: title.to_string(),
        description: "A test product".to_string(),
        price: "$24.99".to_string(),
        original_price: None,
        discount_label: None,
        image_url: "https://images.example.com/p.jpg".to_string(),
        store: "Test Store".to_string(),
        category: "Electronics".to_string(),
        product_url: "https://example.com/p".to_string(),
        rating: 4.4,
        review_count: "(77 reviews)".to_string(),
    }
}

#[tokio::test]
async fn scenario_wireless_earbuds_returns_primary_results_unchanged() {
    let primary_results = vec![
        product("e1", "Earbuds One"),
        product("e2", "Earbuds Two"),
        product("e3", "Earbuds Three"),
    ];
    let primary = ScriptedSearch::new("aggregator", primary_results.clone());
    let secondary = ScriptedSearch::new("marketplace", vec![product("m1", "Decoy")]);

    let orchestrator = SearchOrchestrator::new(vec![primary.clone(), secondary.clone()]);
    let outcome = orchestrator.search_products("wireless earbuds").await;

    assert_eq!(outcome.products, primary_results);
    assert!(outcome.error.is_none());
    assert_eq!(secondary.call_count(), 0);
}

#[tokio::test]
async fn scenario_unmatchable_query_reports_the_notice() {
    let primary = ScriptedSearch::new("aggregator", vec![]);
    let secondary = ScriptedSearch::new("marketplace", vec![]);

    let orchestrator = SearchOrchestrator::new(vec![primary, secondary]);
    let outcome = orchestrator.search_products("zzz_no_such_product_qqq").await;

    assert!(outcome.products.is_empty());
    assert_eq!(
        outcome.error.as_deref(),
        Some("No results found for \"zzz_no_such_product_qqq\"")
    );
}

#[tokio::test]
async fn scenario_detail_fallback_then_cache_hit_without_network() {
    let cache = Arc::new(MemoryDetailCache::new());
    let primary = RateLimitedDetail::new();
    let fallback = ScriptedSearch::new(
        "aggregator",
        vec![product("B000TEST01", "Test Widget")],
    );

    let fetcher = DetailFetcher::new(cache, primary.clone(), fallback.clone());

    // Never-seen id, primary endpoint down, substitute lookup matches.
    let first = fetcher.fetch_detail("B000TEST01").await;
    assert_eq!(first.title, "Test Widget");
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 1);

    // Second fetch serves the cached record with zero network calls.
    let second = fetcher.fetch_detail("B000TEST01").await;
    assert_eq!(second.title, "Test Widget");
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 1);
}
