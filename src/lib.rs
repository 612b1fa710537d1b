//! Vocalis Dashboard API Client Library

pub mod api;
pub mod config;
pub mod identity;
pub mod observability;

pub use api::client::{ApiClient, ApiClientBuilder};
pub use api::types::{ApiError, ApiResult, ErrorCode};
pub use config::ClientConfig;
