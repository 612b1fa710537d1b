//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic parsing. All violations are
//! collected and reported together, not just the first.

use reqwest::header::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Base URL does not parse at all.
    #[error("api.base_url {0:?} is not a valid absolute URL")]
    InvalidBaseUrl(String),

    /// Base URL parses but uses a scheme the client cannot speak.
    #[error("api.base_url {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("timeouts.connect_secs must be greater than zero")]
    ZeroConnectTimeout,

    #[error("identity.header {0:?} is not a valid header name")]
    InvalidIdentityHeader(String),

    #[error("identity.cookie must not be empty")]
    EmptyCookieName,

    #[error("identity.dev_email must not be empty when dev_identity is enabled")]
    EmptyDevEmail,
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(
                config.api.base_url.clone(),
            ));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(
            config.api.base_url.clone(),
        )),
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    if HeaderName::from_bytes(config.identity.header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidIdentityHeader(
            config.identity.header.clone(),
        ));
    }
    if config.identity.cookie.is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }
    if config.identity.dev_identity && config.identity.dev_email.is_empty() {
        errors.push(ValidationError::EmptyDevEmail);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Join violations into a single human-readable string.
pub fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut config = ClientConfig::default();
        config.api.base_url = "not a url".to_string();
        config.timeouts.request_secs = 0;
        config.identity.header = "bad header\n".to_string();
        config.identity.cookie = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::EmptyCookieName));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://app.vocalis.io".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnsupportedScheme(
                "ftp://app.vocalis.io".to_string()
            )]
        );
    }

    #[test]
    fn test_dev_identity_requires_dev_email() {
        let mut config = ClientConfig::default();
        config.identity.dev_identity = true;
        config.identity.dev_email = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyDevEmail]);
    }
}
