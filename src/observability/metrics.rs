//! Metrics collection.
//!
//! # Metrics
//! - `client_requests_total` (counter): completed requests by method, status
//! - `client_request_duration_seconds` (histogram): latency distribution
//! - `client_request_errors_total` (counter): failures by method, error code
//!
//! Emitted through the `metrics` facade; the embedding application decides
//! which recorder, if any, to install.

use std::time::Instant;

use metrics::{counter, histogram};

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "client_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "client_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a failed request by error code.
pub fn record_failure(method: &str, code: &str) {
    counter!(
        "client_request_errors_total",
        "method" => method.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}
