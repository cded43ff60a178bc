//! The canonical `Product` record.
//!
//! Every provider response item is normalized into this one shape before
//! anything downstream sees it. The invariant: every display field is
//! populated with either real data or a defined default, so the rendering
//! layer never special-cases missing fields.

use serde::{Deserialize, Serialize};

/// Sentinel description used when the upstream omits one.
pub const NO_DESCRIPTION: &str = "No description available";

/// Placeholder image shown when the upstream omits a photo.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/300x300.png?text=No+Image";

/// Review-count display string used when the upstream omits one.
pub const DEFAULT_REVIEW_COUNT: &str = "(0 reviews)";

/// Category used when the upstream provides none.
pub const DEFAULT_CATEGORY: &str = "General";

/// Title of the placeholder record returned when every detail path fails.
pub const UNAVAILABLE_TITLE: &str = "Product Information Unavailable";

/// Price of the placeholder record returned when every detail path fails.
pub const UNAVAILABLE_PRICE: &str = "N/A";

/// The canonical product record surfaced to the rendering layer.
///
/// `id` is a provider-scoped identifier (ASIN, generated slug, or
/// provider-supplied id) - unique within a result set, NOT globally unique
/// across providers. `price` keeps the provider-native display formatting;
/// there is no cross-provider currency normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    pub price: String,
    /// Pre-discount price, kept for discount display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    /// Derived label like "23% off" when both prices are known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_label: Option<String>,
    #[serde(default = "default_image_url")]
    pub image_url: String,
    /// Provider/source display name.
    pub store: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub product_url: String,
    /// Defaults to 0 when absent or non-numeric upstream.
    #[serde(default)]
    pub rating: f64,
    /// Display string, e.g. "(128 reviews)".
    #[serde(default = "default_review_count")]
    pub review_count: String,
}

fn default_description() -> String {
    NO_DESCRIPTION.to_string()
}

fn default_image_url() -> String {
    PLACEHOLDER_IMAGE_URL.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_review_count() -> String {
    DEFAULT_REVIEW_COUNT.to_string()
}

impl Product {
    /// Builds the placeholder record returned when every detail path fails.
    ///
    /// Carries a best-effort product URL constructed from the raw id so the
    /// outbound link still works for marketplace identifiers. Callers must
    /// not cache this record - a later attempt should retry real providers.
    pub fn unavailable(item_id: &str) -> Self {
        Self {
            id: item_id.to_string(),
            title: UNAVAILABLE_TITLE.to_string(),
            description: NO_DESCRIPTION.to_string(),
            price: UNAVAILABLE_PRICE.to_string(),
            original_price: None,
            discount_label: None,
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            store: "Unknown".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            product_url: format!("https://www.amazon.com/dp/{}", item_id),
            rating: 0.0,
            review_count: DEFAULT_REVIEW_COUNT.to_string(),
        }
    }

    /// True for the placeholder built by [`Product::unavailable`].
    pub fn is_unavailable(&self) -> bool {
        self.title == UNAVAILABLE_TITLE && self.price == UNAVAILABLE_PRICE
    }
}
