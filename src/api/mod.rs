//! Backend API access subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → client.rs (resolve URL, attach identity, enforce time budget)
//!     → backend API (HTTP + JSON)
//!     → 2xx: body decoded and returned as-is
//!     → non-2xx: envelope.rs parsed into types.rs::ApiError
//! ```
//!
//! # Design Decisions
//! - Every failure is normalized into ApiError; no transport error escapes
//! - Success payloads are trusted; no runtime schema validation
//! - No automatic retries; retry affordances belong to the caller

pub mod client;
pub mod envelope;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, BuildError};
pub use types::{ApiError, ApiResult, ErrorCode};
