//! Error envelope consumed from the backend.

use serde::Deserialize;

use crate::api::types::FieldErrors;

/// Top-level error envelope: `{ "error": { ... } }`.
///
/// Every field is optional; a malformed body degrades to the default
/// rather than failing error reporting itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// Backend-reported failure description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub details: Option<FieldErrors>,
}

impl ErrorEnvelope {
    /// Tolerant parse: any undecodable body yields the empty envelope.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}
