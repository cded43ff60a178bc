//! Saved-items synchronization between the remote account store and the
//! local mirror.

use std::sync::Arc;
use tracing::{debug, warn};

use shopscout_core::ShopscoutError;
use shopscout_core::account::AccountGateway;
use shopscout_core::credential::{Credential, CredentialStore};
use shopscout_core::error::Result;
use shopscout_core::product::Product;
use shopscout_core::saved::{SaveState, SavedMirrorStore, SavedProduct};

/// Toggle/list/clear operations over the saved-products collection.
///
/// The remote store is authoritative when reachable; the local mirror keeps
/// the collection usable through outages. Mutations are optimistic: the
/// local mirror is updated regardless of the remote outcome, so a toggle
/// never appears to fail. When the remote write did not land, the returned
/// state (and the mirrored entry) carries `pending_sync = true` - the stores
/// may diverge until the next successful `list()` reconciliation, and a
/// pending local addition is discarded by that reconciliation unless the
/// remote write is retried first. Known consistency gap, kept observable
/// rather than masked.
pub struct SavedItemsService {
    gateway: Arc<dyn AccountGateway>,
    mirror: Arc<dyn SavedMirrorStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl SavedItemsService {
    pub fn new(
        gateway: Arc<dyn AccountGateway>,
        mirror: Arc<dyn SavedMirrorStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            gateway,
            mirror,
            credentials,
        }
    }

    /// Toggles membership for `product`.
    ///
    /// Membership is decided from the local mirror, the inverse remote
    /// operation is attempted, and the mirror is mutated regardless of the
    /// remote outcome.
    ///
    /// # Errors
    ///
    /// `AuthRequired` when no credential is stored - nothing is contacted
    /// and the mirror is left untouched so the caller can prompt
    /// re-authentication.
    pub async fn toggle_save(&self, product: &Product) -> Result<SaveState> {
        let credential = self.require_credential().await?;

        let currently_saved = self.is_saved(&product.id).await;

        if currently_saved {
            let pending_sync = match self.gateway.remove_saved(&credential, &product.id).await {
                Ok(()) => false,
                Err(err) => {
                    warn!(product_id = %product.id, error = %err, "Remote unsave failed, removing locally anyway");
                    true
                }
            };

            if let Err(err) = self.mirror.remove(&product.id).await {
                warn!(product_id = %product.id, error = %err, "Mirror remove failed");
            }
            Ok(SaveState::unsaved(pending_sync))
        } else {
            let pending_sync = match self.gateway.save_product(&credential, product).await {
                Ok(()) => false,
                Err(err) => {
                    warn!(product_id = %product.id, error = %err, "Remote save failed, saving locally anyway");
                    true
                }
            };

            let entry = SavedProduct::new(product.clone(), pending_sync);
            if let Err(err) = self.mirror.upsert(entry).await {
                warn!(product_id = %product.id, error = %err, "Mirror upsert failed");
            }
            Ok(SaveState::saved(pending_sync))
        }
    }

    /// Returns the saved collection, preferring a fresh remote fetch.
    ///
    /// On remote success the mirror is overwritten entirely with the remote
    /// result (remote is authoritative when reachable); on remote failure or
    /// when signed out, the existing mirror is returned unchanged.
    pub async fn list(&self) -> Vec<SavedProduct> {
        match self.credentials.load().await {
            Ok(Some(credential)) => match self.gateway.fetch_saved(&credential).await {
                Ok(remote) => {
                    if let Err(err) = self.mirror.replace_all(&remote).await {
                        warn!(error = %err, "Mirror reconciliation write failed");
                    }
                    return remote;
                }
                Err(err) => {
                    warn!(error = %err, "Remote saved fetch failed, serving local mirror");
                }
            },
            Ok(None) => debug!("Signed out, serving local mirror"),
            Err(err) => warn!(error = %err, "Credential read failed, serving local mirror"),
        }

        self.mirror.load().await.unwrap_or_default()
    }

    /// Local-mirror membership check for `product_id`.
    pub async fn is_saved(&self, product_id: &str) -> bool {
        self.mirror
            .load()
            .await
            .unwrap_or_default()
            .iter()
            .any(|item| item.product_id == product_id)
    }

    /// Empties the saved collection remotely and locally.
    ///
    /// Follows the toggle policy: the mirror is cleared even when the remote
    /// clear fails (the failure is logged). Entries removed this way may
    /// resurface on the next successful remote `list()`.
    pub async fn clear_all(&self) -> Result<()> {
        let credential = self.require_credential().await?;

        if let Err(err) = self.gateway.clear_saved(&credential).await {
            warn!(error = %err, "Remote clear failed, clearing locally anyway");
        }
        if let Err(err) = self.mirror.clear().await {
            warn!(error = %err, "Mirror clear failed");
        }
        Ok(())
    }

    async fn require_credential(&self) -> Result<Credential> {
        self.credentials
            .load()
            .await?
            .ok_or_else(|| ShopscoutError::auth_required("no stored session credential"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shopscout_core::credential::StaticCredentialStore;
    use shopscout_core::history::SearchHistory;
    use shopscout_core::saved::MemorySavedMirror;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Gateway fake with a real remote collection and failure switches.
    #[derive(Default)]
    struct FakeGateway {
        remote: Mutex<Vec<SavedProduct>>,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeGateway {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn set_fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        fn unreachable_error() -> ShopscoutError {
            ShopscoutError::upstream("account", "connection refused")
        }
    }

    #[async_trait]
    impl AccountGateway for FakeGateway {
        async fn fetch_saved(&self, _credential: &Credential) -> Result<Vec<SavedProduct>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(Self::unreachable_error());
            }
            Ok(self.remote.lock().await.clone())
        }

        async fn save_product(&self, _credential: &Credential, product: &Product) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::unreachable_error());
            }
            let mut remote = self.remote.lock().await;
            remote.retain(|item| item.product_id != product.id);
            remote.push(SavedProduct::new(product.clone(), false));
            Ok(())
        }

        async fn remove_saved(&self, _credential: &Credential, product_id: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::unreachable_error());
            }
            self.remote
                .lock()
                .await
                .retain(|item| item.product_id != product_id);
            Ok(())
        }

        async fn clear_saved(&self, _credential: &Credential) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::unreachable_error());
            }
            self.remote.lock().await.clear();
            Ok(())
        }

        async fn fetch_history(&self, _credential: &Credential) -> Result<SearchHistory> {
            Ok(SearchHistory::default())
        }

        async fn record_history(&self, _credential: &Credential, _term: &str) -> Result<()> {
            Ok(())
        }

        async fn delete_history(&self, _credential: &Credential, _entry_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            description: "A test product".to_string(),
            price: "$9.99".to_string(),
            original_price: None,
            discount_label: None,
            image_url: "https://images.example.com/p.jpg".to_string(),
            store: "Test Store".to_string(),
            category: "Electronics".to_string(),
            product_url: "https://example.com/p".to_string(),
            rating: 4.0,
            review_count: "(12 reviews)".to_string(),
        }
    }

    fn service(gateway: Arc<FakeGateway>) -> (SavedItemsService, Arc<MemorySavedMirror>) {
        let mirror = Arc::new(MemorySavedMirror::new());
        let service = SavedItemsService::new(
            gateway,
            mirror.clone(),
            Arc::new(StaticCredentialStore::signed_in("tok", "user-1")),
        );
        (service, mirror)
    }

    #[tokio::test]
    async fn test_toggle_then_list_round_trip() {
        let gateway = FakeGateway::new();
        let (service, _mirror) = service(gateway.clone());
        let p = product("P1");

        let state = service.toggle_save(&p).await.unwrap();
        assert!(state.saved);
        assert!(!state.pending_sync);

        let listed = service.list().await;
        assert!(listed.iter().any(|item| item.product_id == "P1"));

        let state = service.toggle_save(&p).await.unwrap();
        assert!(!state.saved);

        let listed = service.list().await;
        assert!(!listed.iter().any(|item| item.product_id == "P1"));
    }

    #[tokio::test]
    async fn test_remote_failure_still_saves_locally() {
        let gateway = FakeGateway::new();
        gateway.set_fail_writes(true);
        let (service, mirror) = service(gateway.clone());
        let p = product("P1");

        let state = service.toggle_save(&p).await.unwrap();
        assert!(state.saved);
        assert!(state.pending_sync);

        // Local-only check: the mirror holds the entry even though no remote
        // confirmation occurred.
        let mirrored = mirror.load().await.unwrap();
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].product_id, "P1");
        assert!(mirrored[0].pending_sync);
        assert!(gateway.call_count() >= 1);
    }

    #[tokio::test]
    async fn test_signed_out_toggle_is_a_no_op() {
        let gateway = FakeGateway::new();
        let mirror = Arc::new(MemorySavedMirror::new());
        let service = SavedItemsService::new(
            gateway.clone(),
            mirror.clone(),
            Arc::new(StaticCredentialStore::signed_out()),
        );

        let err = service.toggle_save(&product("P1")).await.unwrap_err();
        assert!(err.is_auth_required());
        // No network call, no mirror mutation.
        assert_eq!(gateway.call_count(), 0);
        assert!(mirror.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_remote_failure_serves_mirror() {
        let gateway = FakeGateway::new();
        let (service, mirror) = service(gateway.clone());

        mirror
            .upsert(SavedProduct::new(product("P1"), true))
            .await
            .unwrap();
        gateway.set_fail_reads(true);

        let listed = service.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product_id, "P1");
    }

    #[tokio::test]
    async fn test_reconciliation_overwrites_pending_local_entries() {
        let gateway = FakeGateway::new();
        let (service, mirror) = service(gateway.clone());

        // A local-only addition made during an outage...
        mirror
            .upsert(SavedProduct::new(product("offline-save"), true))
            .await
            .unwrap();

        // ...is discarded the next time list() succeeds remotely, because
        // the remote copy is authoritative.
        let listed = service.list().await;
        assert!(listed.is_empty());
        assert!(mirror.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_clears_mirror_even_when_remote_fails() {
        let gateway = FakeGateway::new();
        let (service, mirror) = service(gateway.clone());

        service.toggle_save(&product("P1")).await.unwrap();
        gateway.set_fail_writes(true);

        service.clear_all().await.unwrap();
        assert!(mirror.load().await.unwrap().is_empty());
    }
}
