//! Remote account backend gateway trait.
//!
//! The concrete HTTP client lives in the providers crate; the synchronizer
//! and history/recommendation services only see this trait.

use async_trait::async_trait;

use crate::credential::Credential;
use crate::error::Result;
use crate::history::SearchHistory;
use crate::product::Product;
use crate::saved::SavedProduct;

/// Operations against the remote account store.
///
/// Every call takes the caller-supplied credential; callers are responsible
/// for short-circuiting when no credential is stored - implementations may
/// assume one is present.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Fetches the authoritative saved-products collection.
    async fn fetch_saved(&self, credential: &Credential) -> Result<Vec<SavedProduct>>;

    /// Persists one product into the remote saved collection.
    async fn save_product(&self, credential: &Credential, product: &Product) -> Result<()>;

    /// Removes one product from the remote saved collection.
    async fn remove_saved(&self, credential: &Credential, product_id: &str) -> Result<()>;

    /// Empties the remote saved collection.
    async fn clear_saved(&self, credential: &Credential) -> Result<()>;

    /// Fetches the bucketed search history.
    async fn fetch_history(&self, credential: &Credential) -> Result<SearchHistory>;

    /// Records a search term into the remote history.
    async fn record_history(&self, credential: &Credential, term: &str) -> Result<()>;

    /// Deletes one history entry by its backend-assigned id.
    async fn delete_history(&self, credential: &Credential, entry_id: &str) -> Result<()>;
}
