//! AccountClient - ShopScout account backend client.
//!
//! Consumes the versioned account API with a per-request bearer credential:
//! saved-products read/save/delete/clear-all and search-history
//! read/record/delete. Credential presence is checked by the calling
//! services; this client assumes one is supplied.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::env;
use std::time::Duration;
use tracing::debug;

use shopscout_core::ShopscoutError;
use shopscout_core::account::AccountGateway;
use shopscout_core::credential::Credential;
use shopscout_core::error::Result;
use shopscout_core::history::SearchHistory;
use shopscout_core::product::Product;
use shopscout_core::saved::SavedProduct;
use shopscout_infrastructure::SecretStorage;

const DEFAULT_BASE_URL: &str = "https://api.shopscout.app/v1";

/// Service name used in upstream error messages.
const SERVICE: &str = "account";

/// Default timeout for account backend requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the ShopScout account backend.
#[derive(Clone)]
pub struct AccountClient {
    client: Client,
    base_url: String,
}

impl AccountClient {
    /// Creates a new client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Loads the base URL from secret.json or environment variables,
    /// falling back to the production endpoint.
    ///
    /// Priority:
    /// 1. secret.json (`account.base_url`)
    /// 2. Environment variable (SHOPSCOUT_API_URL)
    /// 3. Built-in default
    pub fn from_env() -> Self {
        if let Ok(storage) = SecretStorage::new()
            && let Ok(secret_config) = storage.load()
            && let Some(account_config) = secret_config.account
            && let Some(base_url) = account_config.base_url
        {
            return Self::new(base_url);
        }

        let base_url =
            env::var("SHOPSCOUT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn auth_request(
        &self,
        request: reqwest::RequestBuilder,
        credential: &Credential,
    ) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", credential.token))
            .timeout(DEFAULT_TIMEOUT)
    }

    /// Sends the request and maps transport/status failures to engine errors.
    async fn send_checked(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| ShopscoutError::upstream(SERVICE, format!("request failed: {}", err)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ShopscoutError::auth_required(format!(
                "account backend rejected the credential (HTTP {})",
                status.as_u16()
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopscoutError::upstream(
                SERVICE,
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl AccountGateway for AccountClient {
    async fn fetch_saved(&self, credential: &Credential) -> Result<Vec<SavedProduct>> {
        let url = format!("{}/saved-products", self.base_url);
        let request = self.auth_request(self.client.get(&url), credential);
        let response = self.send_checked(request).await?;

        let items: Vec<SavedProduct> = response
            .json()
            .await
            .map_err(|err| ShopscoutError::upstream(SERVICE, format!("malformed body: {}", err)))?;

        debug!(count = items.len(), "Fetched remote saved products");
        Ok(items)
    }

    async fn save_product(&self, credential: &Credential, product: &Product) -> Result<()> {
        let url = format!("{}/saved-products", self.base_url);
        let request = self.auth_request(self.client.post(&url).json(product), credential);
        self.send_checked(request).await?;
        Ok(())
    }

    async fn remove_saved(&self, credential: &Credential, product_id: &str) -> Result<()> {
        let url = format!("{}/saved-products/{}", self.base_url, product_id);
        let request = self.auth_request(self.client.delete(&url), credential);
        self.send_checked(request).await?;
        Ok(())
    }

    async fn clear_saved(&self, credential: &Credential) -> Result<()> {
        let url = format!("{}/saved-products", self.base_url);
        let request = self.auth_request(self.client.delete(&url), credential);
        self.send_checked(request).await?;
        Ok(())
    }

    async fn fetch_history(&self, credential: &Credential) -> Result<SearchHistory> {
        let url = format!("{}/search-history", self.base_url);
        let request = self.auth_request(self.client.get(&url), credential);
        let response = self.send_checked(request).await?;

        response
            .json()
            .await
            .map_err(|err| ShopscoutError::upstream(SERVICE, format!("malformed body: {}", err)))
    }

    async fn record_history(&self, credential: &Credential, term: &str) -> Result<()> {
        let url = format!("{}/search-history", self.base_url);
        let body = RecordHistoryRequest { term };
        let request = self.auth_request(self.client.post(&url).json(&body), credential);
        self.send_checked(request).await?;
        Ok(())
    }

    async fn delete_history(&self, credential: &Credential, entry_id: &str) -> Result<()> {
        let url = format!("{}/search-history/{}", self.base_url, entry_id);
        let request = self.auth_request(self.client.delete(&url), credential);
        self.send_checked(request).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct RecordHistoryRequest<'a> {
    term: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_base_url() {
        let client = AccountClient::new("https://staging.shopscout.app/v1");
        assert_eq!(client.base_url, "https://staging.shopscout.app/v1");
    }

    #[test]
    fn test_record_history_request_shape() {
        let body = RecordHistoryRequest { term: "earbuds" };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"term": "earbuds"}));
    }
}
