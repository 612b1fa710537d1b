//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured events carry the request ID for correlation
//! - Metrics are cheap facade calls; the embedding application installs
//!   the recorder

pub mod logging;
pub mod metrics;
