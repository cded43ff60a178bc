//! Remote HTTP clients for the ShopScout engine.
//!
//! One client per upstream: the shopping-results aggregator (SerpApi), the
//! marketplace data provider (Amazon over RapidAPI), and the ShopScout
//! account backend. Each client owns its response-shape mapping into the
//! canonical `Product` record; nothing downstream ever sees a raw payload.

pub mod account_client;
pub mod amazon_client;
pub mod serpapi_client;

pub use account_client::AccountClient;
pub use amazon_client::AmazonDataClient;
pub use serpapi_client::SerpApiClient;
