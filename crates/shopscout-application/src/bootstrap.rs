//! Engine assembly.
//!
//! Wires the concrete provider clients and durable stores into the use-case
//! services. The presentation layer constructs one `Engine` per session and
//! calls into its services; every collaborator behind the services is an
//! injectable trait, so tests bypass this module entirely.

use anyhow::{Context, Result};
use std::sync::Arc;

use shopscout_core::account::AccountGateway;
use shopscout_core::cache::DetailCacheStore;
use shopscout_core::credential::CredentialStore;
use shopscout_core::provider::{DetailProvider, SearchProvider};
use shopscout_core::saved::SavedMirrorStore;
use shopscout_infrastructure::{FileCredentialStore, FileDetailCache, FileSavedMirror};
use shopscout_providers::{AccountClient, AmazonDataClient, SerpApiClient};

use crate::detail_service::DetailFetcher;
use crate::history_service::SearchHistoryService;
use crate::recommend_service::RecommendationService;
use crate::saved_service::SavedItemsService;
use crate::search_service::SearchOrchestrator;

/// The assembled engine surface the presentation layer calls into.
pub struct Engine {
    pub search: Arc<SearchOrchestrator>,
    pub details: DetailFetcher,
    pub saved: SavedItemsService,
    pub history: SearchHistoryService,
    pub recommendations: RecommendationService,
}

impl Engine {
    /// Builds the engine from secret.json / environment configuration and
    /// the default storage locations.
    pub async fn try_from_env() -> Result<Self> {
        let serpapi =
            Arc::new(SerpApiClient::try_from_env().context("aggregator configuration")?);
        let amazon =
            Arc::new(AmazonDataClient::try_from_env().context("marketplace configuration")?);
        let account: Arc<dyn AccountGateway> = Arc::new(AccountClient::from_env());

        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new().context("session file location")?);
        let cache: Arc<dyn DetailCacheStore> = Arc::new(
            FileDetailCache::default_location()
                .await
                .context("detail cache location")?,
        );
        let mirror: Arc<dyn SavedMirrorStore> = Arc::new(
            FileSavedMirror::default_location()
                .await
                .context("saved mirror location")?,
        );

        // Fixed search priority: aggregator first, marketplace second.
        let providers: Vec<Arc<dyn SearchProvider>> = vec![serpapi.clone(), amazon.clone()];
        let search = Arc::new(SearchOrchestrator::new(providers));

        // Detail lookups go to the marketplace endpoint first; the
        // aggregator's search-by-identifier is the rate-limit substitute.
        let primary: Arc<dyn DetailProvider> = amazon;
        let fallback: Arc<dyn SearchProvider> = serpapi;
        let details = DetailFetcher::new(cache, primary, fallback);

        let saved = SavedItemsService::new(account.clone(), mirror, credentials.clone());
        let history = SearchHistoryService::new(account.clone(), credentials.clone());
        let recommendations = RecommendationService::new(account, credentials, search.clone());

        Ok(Self {
            search,
            details,
            saved,
            history,
            recommendations,
        })
    }
}
