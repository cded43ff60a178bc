//! Provider-facing error type and the traits at the provider seams.
//!
//! Concrete clients live in the providers crate; the orchestrator and the
//! detail fetcher only see these traits, so tests can substitute fakes with
//! call counters.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::product::Product;

/// Errors from a single upstream provider call.
///
/// These never escape past the provider clients or the detail fetcher; they
/// exist so the fetcher can distinguish a rate-limit condition (which has a
/// substitute-lookup fallback) from every other failure (which does not).
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Transport failure (connect, timeout, TLS)
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    /// Upstream returned a non-2xx status
    #[error("{provider} returned HTTP {status}: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Upstream rate limit hit (HTTP 429)
    #[error("{provider} rate limited")]
    RateLimited {
        provider: &'static str,
        retry_after: Option<Duration>,
    },

    /// Response body did not match the expected shape
    #[error("failed to parse {provider} response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    /// Upstream answered but has no record for the requested item
    #[error("{provider} has no item '{id}'")]
    NotFound { provider: &'static str, id: String },
}

impl ProviderError {
    /// Check if this is the distinguishable rate-limit condition.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// The provider the error originated from.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Transport { provider, .. }
            | Self::Api { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Parse { provider, .. }
            | Self::NotFound { provider, .. } => provider,
        }
    }
}

/// A free-text product search against one upstream provider.
///
/// Contract: the query must be non-empty after trimming (callers trim; an
/// empty query is undefined behavior). The call never raises - any transport
/// error, malformed payload, or empty upstream result collapses to an empty
/// list. Each implementation owns its response-shape mapping and applies the
/// `Product` defaulting rules before returning.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Display name of the provider (used for logging and the `store` field).
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> Vec<Product>;
}

/// A per-item detail lookup against one upstream provider.
#[async_trait]
pub trait DetailProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_detail(&self, item_id: &str) -> Result<Product, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_is_distinguishable() {
        let err = ProviderError::RateLimited {
            provider: "Amazon",
            retry_after: Some(Duration::from_secs(2)),
        };
        assert!(err.is_rate_limited());
        assert_eq!(err.provider(), "Amazon");

        let err = ProviderError::Api {
            provider: "Amazon",
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_rate_limited());
    }
}
