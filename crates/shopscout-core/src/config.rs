use serde::{Deserialize, Serialize};

/// Secret configuration loaded from secret.json.
///
/// Holds the static provider credentials; absent sections simply disable the
/// corresponding client's `try_from_env` path (environment variables are the
/// fallback).
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub serpapi: Option<SerpApiConfig>,
    #[serde(default)]
    pub rapidapi: Option<RapidApiConfig>,
    #[serde(default)]
    pub account: Option<AccountConfig>,
}

/// Shopping-results aggregator credentials.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SerpApiConfig {
    pub api_key: String,
}

/// Marketplace data provider credentials.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RapidApiConfig {
    pub api_key: String,
    /// Override for the API host, defaults to the standard host when absent.
    #[serde(default)]
    pub host: Option<String>,
}

/// Account backend location.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AccountConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}
