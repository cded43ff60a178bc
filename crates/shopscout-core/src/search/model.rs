//! Search domain models.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Result of one search orchestration.
///
/// An empty result set is a reported, not fatal, condition: `error` carries a
/// user-displayable notice when every provider came back empty, and stays
/// `None` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    /// Normalized products in provider order.
    pub products: Vec<Product>,

    /// User-displayable advisory when no provider had results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    /// Creates an outcome carrying results.
    pub fn found(products: Vec<Product>) -> Self {
        Self {
            products,
            error: None,
        }
    }

    /// Creates the all-providers-empty outcome with the templated notice.
    pub fn none_for(query: &str) -> Self {
        Self {
            products: Vec::new(),
            error: Some(format!("No results found for \"{}\"", query)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
