//! Authenticated request client for the dashboard API.
//!
//! # Responsibilities
//! - Resolve request URLs against the configured base
//! - Attach caller identity and correlation headers
//! - Bound every call with its own request timeout
//! - Normalize transport, HTTP and application failures into [`ApiError`]

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use uuid::Uuid;

use crate::api::envelope::ErrorEnvelope;
use crate::api::types::{ApiError, ApiResult, ErrorCode};
use crate::config::schema::ClientConfig;
use crate::config::validation::{describe, validate_config, ValidationError};
use crate::identity::resolver::IdentityChain;
use crate::identity::sources::{
    CookieProvider, CookieResolver, LoopbackResolver, SessionProvider, SessionResolver,
};
use crate::observability::metrics;

/// Correlation header attached to every outgoing request.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Error constructing an [`ApiClient`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration failed semantic validation.
    #[error("configuration rejected: {}", describe(.0))]
    Config(Vec<ValidationError>),

    /// Underlying HTTP client could not be constructed.
    #[error("failed to construct HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Builder wiring optional identity collaborators into the client.
pub struct ApiClientBuilder {
    config: ClientConfig,
    session: Option<Arc<dyn SessionProvider>>,
    cookies: Option<Arc<dyn CookieProvider>>,
}

impl ApiClientBuilder {
    /// Attach a session lookup, consulted after the loopback bypass.
    pub fn session_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(provider);
        self
    }

    /// Attach a cookie store, consulted last.
    pub fn cookie_provider(mut self, provider: Arc<dyn CookieProvider>) -> Self {
        self.cookies = Some(provider);
        self
    }

    /// Validate the configuration and construct the client.
    pub fn build(self) -> Result<ApiClient, BuildError> {
        validate_config(&self.config).map_err(BuildError::Config)?;

        let base_url = Url::parse(&self.config.api.base_url).map_err(|_| {
            BuildError::Config(vec![ValidationError::InvalidBaseUrl(
                self.config.api.base_url.clone(),
            )])
        })?;
        let identity_header = HeaderName::from_bytes(self.config.identity.header.as_bytes())
            .map_err(|_| {
                BuildError::Config(vec![ValidationError::InvalidIdentityHeader(
                    self.config.identity.header.clone(),
                )])
            })?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.config.timeouts.connect_secs))
            .cookie_store(true)
            .build()?;

        // Fixed precedence: loopback bypass, then session, then cookie.
        let mut chain = IdentityChain::new();
        chain.push(Box::new(LoopbackResolver::new(
            self.config.identity.dev_identity,
            base_url.host().map(|h| h.to_owned()),
            self.config.identity.dev_email.clone(),
        )));
        if let Some(session) = self.session {
            chain.push(Box::new(SessionResolver::new(session)));
        }
        if let Some(cookies) = self.cookies {
            chain.push(Box::new(CookieResolver::new(
                cookies,
                self.config.identity.cookie.clone(),
            )));
        }

        Ok(ApiClient {
            http,
            base_url,
            identity_header,
            identity: Arc::new(chain),
            config: Arc::new(self.config),
        })
    }
}

/// Client for the Vocalis dashboard API.
///
/// Cheap to clone; clones share the connection pool and configuration.
/// Every call owns its own timeout scope, so concurrent calls never
/// interfere with one another.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    base_url: Url,
    identity_header: HeaderName,
    identity: Arc<IdentityChain>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("identity_header", &self.identity_header)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Start building a client from a configuration.
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            session: None,
            cookies: None,
        }
    }

    /// Construct a client with no session or cookie collaborators.
    pub fn new(config: ClientConfig) -> Result<Self, BuildError> {
        Self::builder(config).build()
    }

    /// GET a path and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::GET, path, None::<&()>, None).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body), None).await
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body), None).await
    }

    /// PATCH a JSON body and decode the JSON response.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PATCH, path, Some(body), None).await
    }

    /// DELETE a path and decode the JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::DELETE, path, None::<&()>, None).await
    }

    /// Perform a single request against the backend API.
    ///
    /// Identity is resolved once per call. Extra headers are merged after
    /// the defaults, so an explicit caller `Content-Type` wins. The call is
    /// raced against the configured request budget; dropping the returned
    /// future cancels the in-flight request along with its timer.
    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        extra_headers: Option<HeaderMap>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let started = Instant::now();
        let url = self.resolve_url(path)?;
        let request_id = Uuid::new_v4();
        let method_label = method.to_string();

        let payload = match body {
            Some(body) => Some(serde_json::to_vec(body).map_err(|e| {
                ApiError::unknown(format!("failed to serialize request body: {e}"))
            })?),
            None => None,
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            headers.insert(X_REQUEST_ID, value);
        }
        if let Some(email) = self.identity.resolve().await {
            match HeaderValue::from_str(&email) {
                Ok(value) => {
                    headers.insert(self.identity_header.clone(), value);
                }
                Err(_) => tracing::warn!(
                    header = %self.identity_header,
                    "resolved identity is not header-safe, sending without it"
                ),
            }
        }
        if let Some(extra) = extra_headers {
            for (name, value) in extra.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }

        let budget = Duration::from_secs(self.config.timeouts.request_secs);
        let outcome = match timeout(budget, self.execute::<T>(method, url.clone(), payload, headers)).await
        {
            Ok(result) => result,
            Err(_) => Err(ApiError::timeout(self.config.timeouts.request_secs)),
        };

        match &outcome {
            Ok((status, _)) => {
                tracing::debug!(
                    request_id = %request_id,
                    method = %method_label,
                    url = %url,
                    status = status.as_u16(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "API request completed"
                );
                metrics::record_request(&method_label, status.as_u16(), started);
            }
            Err(error) => {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method_label,
                    url = %url,
                    code = error.code_label(),
                    status = error.status,
                    "API request failed"
                );
                metrics::record_failure(&method_label, error.code_label());
            }
        }

        outcome.map(|(_, value)| value)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        payload: Option<Vec<u8>>,
        headers: HeaderMap,
    ) -> ApiResult<(StatusCode, T)> {
        let mut request = self.http.request(method, url).headers(headers);
        if let Some(bytes) = payload {
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();

        if !status.is_success() {
            // Bodies that are unreadable or not the envelope shape still
            // produce a structured error.
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(error_from_response(status, &bytes));
        }

        let bytes = response.bytes().await.map_err(classify_transport)?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::unknown(format!("failed to decode response body: {e}")))?;
        Ok((status, value))
    }

    /// Resolve a path against the configured base URL.
    ///
    /// Fully-qualified URLs pass through untouched.
    fn resolve_url(&self, path: &str) -> ApiResult<Url> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.as_str().trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };
        Url::parse(&raw).map_err(|e| ApiError::unknown(format!("invalid request URL {raw:?}: {e}")))
    }
}

/// Map a transport-level failure onto the error taxonomy.
fn classify_transport(error: reqwest::Error) -> ApiError {
    if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
        ApiError::network(format!("could not reach the API server: {error}"))
    } else {
        ApiError::unknown(error.to_string())
    }
}

/// Build a structured error from a non-success response.
fn error_from_response(status: StatusCode, body: &[u8]) -> ApiError {
    let envelope = ErrorEnvelope::from_bytes(body);
    let reported = envelope.error.unwrap_or_default();

    ApiError {
        message: reported
            .message
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        code: reported.code.map(ErrorCode::Server),
        details: reported.details,
        status: Some(status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        ApiClient::new(ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_relative_path_joins_base() {
        let client = test_client();
        let url = client.resolve_url("/api/user/agents").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/user/agents");

        // Missing leading slash resolves the same way.
        let url = client.resolve_url("api/user/agents").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/user/agents");
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let client = test_client();
        let url = client.resolve_url("https://other.vocalis.io/api/ping").unwrap();
        assert_eq!(url.as_str(), "https://other.vocalis.io/api/ping");
    }

    #[test]
    fn test_unresolvable_path_is_unknown_error() {
        let client = test_client();
        let err = client.resolve_url("http://").unwrap_err();
        assert_eq!(err.code, Some(ErrorCode::Unknown));
    }

    #[test]
    fn test_error_from_envelope() {
        let err = error_from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"error":{"message":"Validation failed","code":"VALIDATION_ERROR","details":{"name":["required"]}}}"#,
        );

        assert_eq!(err.message, "Validation failed");
        assert_eq!(err.code, Some(ErrorCode::Server("VALIDATION_ERROR".to_string())));
        assert_eq!(err.status, Some(422));
        assert_eq!(err.details.unwrap()["name"], vec!["required".to_string()]);
    }

    #[test]
    fn test_error_from_malformed_body() {
        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, b"boom");
        assert_eq!(err.message, "HTTP 500");
        assert_eq!(err.code, None);
        assert_eq!(err.status, Some(500));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = ClientConfig::default();
        config.api.base_url = "not a url".to_string();
        let err = ApiClient::new(config).unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }
}
