//! Remote search-history operations.

use std::sync::Arc;
use tracing::debug;

use shopscout_core::ShopscoutError;
use shopscout_core::account::AccountGateway;
use shopscout_core::credential::{Credential, CredentialStore};
use shopscout_core::error::Result;
use shopscout_core::history::SearchHistory;

/// Read/record/delete over the remote search history.
///
/// Every operation short-circuits with `AuthRequired` when no credential is
/// stored - the network is never contacted in that case.
pub struct SearchHistoryService {
    gateway: Arc<dyn AccountGateway>,
    credentials: Arc<dyn CredentialStore>,
}

impl SearchHistoryService {
    pub fn new(gateway: Arc<dyn AccountGateway>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    /// Fetches the bucketed history.
    pub async fn list(&self) -> Result<SearchHistory> {
        let credential = self.require_credential().await?;
        self.gateway.fetch_history(&credential).await
    }

    /// Records a search term. Callers trim before invoking; blank terms are
    /// skipped silently.
    pub async fn record(&self, term: &str) -> Result<()> {
        if term.is_empty() {
            debug!("Skipping empty history term");
            return Ok(());
        }

        let credential = self.require_credential().await?;
        self.gateway.record_history(&credential, term).await
    }

    /// Deletes one history entry by its backend-assigned id.
    pub async fn delete(&self, entry_id: &str) -> Result<()> {
        let credential = self.require_credential().await?;
        self.gateway.delete_history(&credential, entry_id).await
    }

    async fn require_credential(&self) -> Result<Credential> {
        self.credentials
            .load()
            .await?
            .ok_or_else(|| ShopscoutError::auth_required("no stored session credential"))
    }
}
