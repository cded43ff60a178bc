//! AmazonDataClient - marketplace data provider client.
//!
//! Talks to a RapidAPI-hosted Amazon product-data API: free-text search and
//! per-ASIN detail lookups. A 429 from the detail endpoint is surfaced as the
//! distinguishable rate-limit condition so the fetcher can fall back to the
//! aggregator's search-by-identifier.
//! Configuration priority: secret.json > environment variables

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use shopscout_core::ShopscoutError;
use shopscout_core::product::{
    DEFAULT_CATEGORY, DEFAULT_REVIEW_COUNT, NO_DESCRIPTION, PLACEHOLDER_IMAGE_URL,
    Product, UNAVAILABLE_PRICE,
};
use shopscout_core::provider::{DetailProvider, ProviderError, SearchProvider};
use shopscout_infrastructure::SecretStorage;

const DEFAULT_HOST: &str = "real-time-amazon-data.p.rapidapi.com";
const DEFAULT_COUNTRY: &str = "US";

/// Display name used for logging and the `store` field.
const PROVIDER: &str = "Amazon";

/// Default timeout for marketplace requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the marketplace product-data API.
#[derive(Clone)]
pub struct AmazonDataClient {
    client: Client,
    api_key: String,
    host: String,
    country: String,
}

impl AmazonDataClient {
    /// Creates a new client with the provided RapidAPI key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            host: DEFAULT_HOST.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }

    /// Loads configuration from secret.json or environment variables.
    ///
    /// Priority:
    /// 1. secret.json (`rapidapi.api_key`, optional `rapidapi.host`)
    /// 2. Environment variables (RAPIDAPI_KEY, RAPIDAPI_AMAZON_HOST)
    pub fn try_from_env() -> Result<Self, ShopscoutError> {
        if let Ok(storage) = SecretStorage::new()
            && let Ok(secret_config) = storage.load()
            && let Some(rapidapi_config) = secret_config.rapidapi
        {
            let mut client = Self::new(rapidapi_config.api_key);
            if let Some(host) = rapidapi_config.host {
                client = client.with_host(host);
            }
            return Ok(client);
        }

        let api_key = env::var("RAPIDAPI_KEY").map_err(|_| {
            ShopscoutError::config(
                "RAPIDAPI_KEY not found in secret.json or environment variables",
            )
        })?;

        let mut client = Self::new(api_key);
        if let Ok(host) = env::var("RAPIDAPI_AMAZON_HOST") {
            client = client.with_host(host);
        }
        Ok(client)
    }

    /// Overrides the API host after construction.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the marketplace country after construction.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("https://{}/{}", self.host, path);

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .query(query)
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await
            .map_err(|err| ProviderError::Transport {
                provider: PROVIDER,
                message: format!("request failed: {}", err),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body, retry_after));
        }

        response.json().await.map_err(|err| ProviderError::Parse {
            provider: PROVIDER,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for AmazonDataClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> Vec<Product> {
        debug!(query, "Querying marketplace search");

        let result: Result<AmazonSearchResponse, _> = self
            .get_json(
                "search",
                &[
                    ("query", query),
                    ("page", "1"),
                    ("country", self.country.as_str()),
                ],
            )
            .await;

        match result {
            Ok(parsed) => {
                let items = parsed.data.map(|data| data.products).unwrap_or_default();
                debug!(query, count = items.len(), "Marketplace search complete");
                items.into_iter().map(map_search_item).collect()
            }
            Err(err) => {
                warn!(query, error = %err, "Marketplace search failed, returning empty result set");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl DetailProvider for AmazonDataClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_detail(&self, item_id: &str) -> Result<Product, ProviderError> {
        debug!(item_id, "Querying marketplace product details");

        let parsed: AmazonDetailResponse = self
            .get_json(
                "product-details",
                &[("asin", item_id), ("country", self.country.as_str())],
            )
            .await?;

        let detail = parsed.data.ok_or_else(|| ProviderError::NotFound {
            provider: PROVIDER,
            id: item_id.to_string(),
        })?;

        Ok(map_detail(item_id, detail))
    }
}

/// Normalizes one marketplace search result into the canonical record.
fn map_search_item(item: AmazonSearchItem) -> Product {
    let product_url = item
        .product_url
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| format!("https://www.amazon.com/dp/{}", item.asin));
    let discount_label = discount_label_from_display(
        item.product_price.as_deref(),
        item.product_original_price.as_deref(),
    );

    Product {
        id: item.asin,
        title: item.product_title.unwrap_or_default(),
        description: NO_DESCRIPTION.to_string(),
        price: item
            .product_price
            .filter(|price| !price.is_empty())
            .unwrap_or_else(|| UNAVAILABLE_PRICE.to_string()),
        original_price: item.product_original_price.filter(|price| !price.is_empty()),
        discount_label,
        image_url: item
            .product_photo
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        store: PROVIDER.to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        product_url,
        rating: item
            .product_star_rating
            .as_ref()
            .and_then(json_number)
            .unwrap_or(0.0),
        review_count: item
            .product_num_ratings
            .as_ref()
            .and_then(json_number)
            .map(|count| format!("({} reviews)", count as u64))
            .unwrap_or_else(|| DEFAULT_REVIEW_COUNT.to_string()),
    }
}

/// Normalizes a detail response into the canonical record.
fn map_detail(item_id: &str, detail: AmazonProductDetail) -> Product {
    let description = detail
        .product_description
        .filter(|text| !text.is_empty())
        .or_else(|| {
            detail
                .about_product
                .filter(|bullets| !bullets.is_empty())
                .map(|bullets| bullets.join(" "))
        })
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let category = detail
        .category
        .map(CategoryField::into_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let product_url = detail
        .product_url
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| format!("https://www.amazon.com/dp/{}", item_id));
    let discount_label = discount_label_from_display(
        detail.product_price.as_deref(),
        detail.product_original_price.as_deref(),
    );

    Product {
        id: detail.asin.unwrap_or_else(|| item_id.to_string()),
        title: detail.product_title.unwrap_or_default(),
        description,
        price: detail
            .product_price
            .filter(|price| !price.is_empty())
            .unwrap_or_else(|| UNAVAILABLE_PRICE.to_string()),
        original_price: detail
            .product_original_price
            .filter(|price| !price.is_empty()),
        discount_label,
        image_url: detail
            .product_photo
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        store: PROVIDER.to_string(),
        category,
        product_url,
        rating: detail
            .product_star_rating
            .as_ref()
            .and_then(json_number)
            .unwrap_or(0.0),
        review_count: detail
            .product_num_ratings
            .as_ref()
            .and_then(json_number)
            .map(|count| format!("({} reviews)", count as u64))
            .unwrap_or_else(|| DEFAULT_REVIEW_COUNT.to_string()),
    }
}

/// Derives a "NN% off" label from provider-native display prices.
fn discount_label_from_display(price: Option<&str>, old_price: Option<&str>) -> Option<String> {
    let price = price.and_then(parse_price_amount)?;
    let old_price = old_price.and_then(parse_price_amount)?;
    if old_price > price && old_price > 0.0 {
        let pct = ((1.0 - price / old_price) * 100.0).round() as u64;
        (pct > 0).then(|| format!("{}% off", pct))
    } else {
        None
    }
}

/// Extracts the numeric amount from a display price like "$1,299.99".
fn parse_price_amount(display: &str) -> Option<f64> {
    let cleaned: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().ok()
}

/// Coerces a rating/review JSON value that may arrive as a number or string.
fn json_number(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after: Option<Duration>,
) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited {
            provider: PROVIDER,
            retry_after,
        };
    }

    ProviderError::Api {
        provider: PROVIDER,
        status: status.as_u16(),
        message: body,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}

// ============================================================================
// Marketplace API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AmazonSearchResponse {
    #[serde(default)]
    data: Option<AmazonSearchData>,
}

#[derive(Debug, Deserialize)]
struct AmazonSearchData {
    #[serde(default)]
    products: Vec<AmazonSearchItem>,
}

#[derive(Debug, Deserialize)]
struct AmazonSearchItem {
    asin: String,
    #[serde(default)]
    product_title: Option<String>,
    #[serde(default)]
    product_price: Option<String>,
    #[serde(default)]
    product_original_price: Option<String>,
    #[serde(default)]
    product_photo: Option<String>,
    #[serde(default)]
    product_url: Option<String>,
    #[serde(default)]
    product_star_rating: Option<serde_json::Value>,
    #[serde(default)]
    product_num_ratings: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AmazonDetailResponse {
    #[serde(default)]
    data: Option<AmazonProductDetail>,
}

#[derive(Debug, Deserialize)]
struct AmazonProductDetail {
    #[serde(default)]
    asin: Option<String>,
    #[serde(default)]
    product_title: Option<String>,
    #[serde(default)]
    product_description: Option<String>,
    #[serde(default)]
    about_product: Option<Vec<String>>,
    #[serde(default)]
    product_price: Option<String>,
    #[serde(default)]
    product_original_price: Option<String>,
    #[serde(default)]
    product_photo: Option<String>,
    #[serde(default)]
    product_url: Option<String>,
    #[serde(default)]
    category: Option<CategoryField>,
    #[serde(default)]
    product_star_rating: Option<serde_json::Value>,
    #[serde(default)]
    product_num_ratings: Option<serde_json::Value>,
}

/// The upstream category field arrives either as a plain string or as a
/// structured object; only the name is kept.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryField {
    Structured {
        name: String,
    },
    Plain(String),
}

impl CategoryField {
    fn into_name(self) -> String {
        match self {
            CategoryField::Structured { name } => name,
            CategoryField::Plain(name) => name,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
