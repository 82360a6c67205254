//! Marketplace inspection client: per-tab property search, a capped
//! selection registry with negotiated prices and letters of intent, the
//! inspection fee, and the three-step checkout that books an inspection.

pub mod config;
pub mod dtos;
pub mod models;
pub mod service;
pub mod telemetry;
pub mod utils;

pub use config::Config;
pub use models::propertymodel::MarketTab;
pub use service::{
    api_client::{ApiClient, MarketplaceApi},
    error::ServiceError,
    marketplace_store::MarketplaceStore,
};
