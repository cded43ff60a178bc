//! Saved-product models.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::product::Product;

/// A saved product: the canonical record plus association metadata.
///
/// Keyed by `product_id`; at most one per product id per user. `pending_sync`
/// marks an entry whose remote write has not been confirmed - the local and
/// remote stores may diverge until the next successful reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProduct {
    pub product_id: String,
    pub product: Product,
    /// RFC 3339 timestamp of the local save.
    pub saved_at: String,
    #[serde(default)]
    pub pending_sync: bool,
}

impl SavedProduct {
    /// Creates a saved entry for `product`, stamped now.
    pub fn new(product: Product, pending_sync: bool) -> Self {
        Self {
            product_id: product.id.clone(),
            product,
            saved_at: Utc::now().to_rfc3339(),
            pending_sync,
        }
    }
}

/// Membership state returned by a toggle operation.
///
/// No intermediate "saving" state exists - the toggle is synchronous from the
/// caller's perspective. `pending_sync` is true when the local mutation
/// succeeded but the remote write did not land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub saved: bool,
    pub pending_sync: bool,
}

impl SaveState {
    pub fn saved(pending_sync: bool) -> Self {
        Self {
            saved: true,
            pending_sync,
        }
    }

    pub fn unsaved(pending_sync: bool) -> Self {
        Self {
            saved: false,
            pending_sync,
        }
    }
}
