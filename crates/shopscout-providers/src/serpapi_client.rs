//! SerpApiClient - shopping-results aggregator client.
//!
//! Queries the Google Shopping engine through SerpApi and normalizes its
//! response shape into canonical `Product` records.
//! Configuration priority: secret.json > environment variables

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use shopscout_core::ShopscoutError;
use shopscout_core::product::{
    DEFAULT_CATEGORY, DEFAULT_REVIEW_COUNT, NO_DESCRIPTION, PLACEHOLDER_IMAGE_URL,
    Product, UNAVAILABLE_PRICE,
};
use shopscout_core::provider::{ProviderError, SearchProvider};
use shopscout_infrastructure::SecretStorage;

const BASE_URL: &str = "https://serpapi.com/search.json";
const ENGINE: &str = "google_shopping";

/// Display name used for logging and as the `store` fallback.
const PROVIDER: &str = "Google Shopping";

/// Default timeout for aggregator requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the SerpApi Google Shopping engine.
#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    api_key: String,
    country: String,
    language: String,
}

impl SerpApiClient {
    /// Creates a new client with the provided API key and default locale.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            country: "us".to_string(),
            language: "en".to_string(),
        }
    }

    /// Loads configuration from secret.json or environment variables.
    ///
    /// Priority:
    /// 1. secret.json (`serpapi.api_key`)
    /// 2. Environment variable (SERPAPI_API_KEY)
    pub fn try_from_env() -> Result<Self, ShopscoutError> {
        if let Ok(storage) = SecretStorage::new()
            && let Ok(secret_config) = storage.load()
            && let Some(serpapi_config) = secret_config.serpapi
        {
            return Ok(Self::new(serpapi_config.api_key));
        }

        let api_key = env::var("SERPAPI_API_KEY").map_err(|_| {
            ShopscoutError::config(
                "SERPAPI_API_KEY not found in secret.json or environment variables",
            )
        })?;
        Ok(Self::new(api_key))
    }

    /// Overrides the locale parameters (`gl`/`hl`) after construction.
    pub fn with_locale(mut self, country: impl Into<String>, language: impl Into<String>) -> Self {
        self.country = country.into();
        self.language = language.into();
        self
    }

    async fn request_shopping(&self, query: &str) -> Result<Vec<SerpShoppingItem>, ProviderError> {
        debug!(query, "Querying SerpApi shopping results");

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("engine", ENGINE),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("gl", self.country.as_str()),
                ("hl", self.language.as_str()),
            ])
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await
            .map_err(|err| ProviderError::Transport {
                provider: PROVIDER,
                message: format!("SerpApi request failed: {}", err),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body));
        }

        let parsed: SerpShoppingResponse =
            response.json().await.map_err(|err| ProviderError::Parse {
                provider: PROVIDER,
                message: err.to_string(),
            })?;

        Ok(parsed.shopping_results)
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> Vec<Product> {
        match self.request_shopping(query).await {
            Ok(items) => {
                debug!(query, count = items.len(), "SerpApi search complete");
                items.into_iter().map(map_shopping_item).collect()
            }
            Err(err) => {
                warn!(query, error = %err, "SerpApi search failed, returning empty result set");
                Vec::new()
            }
        }
    }
}

/// Normalizes one aggregator result item into the canonical record.
fn map_shopping_item(item: SerpShoppingItem) -> Product {
    let id = item
        .product_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| slug_id(&item.title));

    let product_url = item
        .product_link
        .or(item.link)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| {
            format!(
                "https://www.google.com/search?tbm=shop&q={}",
                item.title.replace(' ', "+")
            )
        });

    let discount_label = discount_label(item.extracted_price, item.extracted_old_price);

    Product {
        id,
        title: item.title,
        description: NO_DESCRIPTION.to_string(),
        price: item
            .price
            .filter(|price| !price.is_empty())
            .unwrap_or_else(|| UNAVAILABLE_PRICE.to_string()),
        original_price: item.old_price.filter(|price| !price.is_empty()),
        discount_label,
        image_url: item
            .thumbnail
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        store: item
            .source
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| PROVIDER.to_string()),
        category: DEFAULT_CATEGORY.to_string(),
        product_url,
        rating: item.rating.as_ref().and_then(json_number).unwrap_or(0.0),
        review_count: item
            .reviews
            .as_ref()
            .and_then(json_number)
            .map(|count| format!("({} reviews)", count as u64))
            .unwrap_or_else(|| DEFAULT_REVIEW_COUNT.to_string()),
    }
}

/// Generates a stable slug id for items the aggregator returns without one.
fn slug_id(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        slug
    }
}

/// Derives a "NN% off" label when both prices are known and discounted.
fn discount_label(price: Option<f64>, old_price: Option<f64>) -> Option<String> {
    match (price, old_price) {
        (Some(price), Some(old_price)) if old_price > price && old_price > 0.0 => {
            let pct = ((1.0 - price / old_price) * 100.0).round() as u64;
            (pct > 0).then(|| format!("{}% off", pct))
        }
        _ => None,
    }
}

/// Coerces a rating/review JSON value that may arrive as a number or string.
fn json_number(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn map_http_error(status: StatusCode, body: String) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited {
            provider: PROVIDER,
            retry_after: None,
        };
    }

    ProviderError::Api {
        provider: PROVIDER,
        status: status.as_u16(),
        message: body,
    }
}

// ============================================================================
// SerpApi Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SerpShoppingResponse {
    #[serde(default)]
    shopping_results: Vec<SerpShoppingItem>,
}

#[derive(Debug, Deserialize)]
struct SerpShoppingItem {
    title: String,
    #[serde(default)]
    product_id: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    extracted_price: Option<f64>,
    #[serde(default)]
    old_price: Option<String>,
    #[serde(default)]
    extracted_old_price: Option<f64>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    product_link: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    rating: Option<serde_json::Value>,
    #[serde(default)]
    reviews: Option<serde_json::Value>,
}

// ============================================================================
// Tests
// ============================================================================
