//! Identity resolution strategies.
//!
//! # Precedence
//! 1. Loopback development identity (explicit flag AND loopback host)
//! 2. Active session lookup (failures swallowed, resolution falls through)
//! 3. Client-visible cookie, URL-decoded

use std::sync::Arc;

use async_trait::async_trait;
use url::Host;

use crate::identity::resolver::IdentityResolver;

/// Boxed error for collaborator lookups.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Supplies the active session's user email, if any.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn user_email(&self) -> Result<Option<String>, BoxError>;
}

/// Read access to client-visible cookies.
pub trait CookieProvider: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Development-only placeholder identity for loopback targets.
///
/// Applies only when BOTH the explicit development flag and a loopback API
/// host are present.
pub struct LoopbackResolver {
    enabled: bool,
    host: Option<Host<String>>,
    dev_email: String,
}

impl LoopbackResolver {
    pub fn new(enabled: bool, host: Option<Host<String>>, dev_email: String) -> Self {
        Self {
            enabled,
            host,
            dev_email,
        }
    }

    fn host_is_loopback(&self) -> bool {
        match &self.host {
            Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
            Some(Host::Ipv4(ip)) => ip.is_loopback(),
            Some(Host::Ipv6(ip)) => ip.is_loopback(),
            None => false,
        }
    }
}

#[async_trait]
impl IdentityResolver for LoopbackResolver {
    fn name(&self) -> &'static str {
        "loopback"
    }

    async fn resolve(&self) -> Option<String> {
        if self.enabled && self.host_is_loopback() {
            Some(self.dev_email.clone())
        } else {
            None
        }
    }
}

/// Resolves identity from the active session.
pub struct SessionResolver {
    provider: Arc<dyn SessionProvider>,
}

impl SessionResolver {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl IdentityResolver for SessionResolver {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn resolve(&self) -> Option<String> {
        // Anonymous and expired sessions are routine; fall through.
        match self.provider.user_email().await {
            Ok(email) => email.filter(|e| !e.is_empty()),
            Err(error) => {
                tracing::debug!(error = %error, "session lookup failed");
                None
            }
        }
    }
}

/// Resolves identity from a named, URL-encoded cookie.
pub struct CookieResolver {
    provider: Arc<dyn CookieProvider>,
    cookie_name: String,
}

impl CookieResolver {
    pub fn new(provider: Arc<dyn CookieProvider>, cookie_name: String) -> Self {
        Self {
            provider,
            cookie_name,
        }
    }
}

#[async_trait]
impl IdentityResolver for CookieResolver {
    fn name(&self) -> &'static str {
        "cookie"
    }

    async fn resolve(&self) -> Option<String> {
        let raw = self.provider.get(&self.cookie_name)?;
        match urlencoding::decode(&raw) {
            Ok(decoded) if !decoded.is_empty() => Some(decoded.into_owned()),
            Ok(_) => None,
            Err(error) => {
                tracing::debug!(
                    cookie = %self.cookie_name,
                    error = %error,
                    "cookie value did not decode"
                );
                None
            }
        }
    }
}
