//! Application layer for the ShopScout engine.
//!
//! This crate provides the use-case services the presentation layer calls
//! into: search orchestration, detail fetching, saved-items synchronization,
//! search history, and history-driven recommendations.

pub mod bootstrap;
pub mod detail_service;
pub mod history_service;
pub mod recommend_service;
pub mod saved_service;
pub mod search_service;

pub use bootstrap::Engine;
pub use detail_service::DetailFetcher;
pub use history_service::SearchHistoryService;
pub use recommend_service::RecommendationService;
pub use saved_service::SavedItemsService;
pub use search_service::SearchOrchestrator;
