//! Identity resolution chain.
//!
//! Resolution strategies form an explicit ordered list; the first strategy
//! yielding an identity wins and later ones are not consulted.

use async_trait::async_trait;

/// A single identity resolution strategy.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Short name used in debug logs.
    fn name(&self) -> &'static str;

    /// Attempt to resolve the caller's email. `None` falls through to the
    /// next strategy.
    async fn resolve(&self) -> Option<String>;
}

/// Ordered list of resolution strategies.
#[derive(Default)]
pub struct IdentityChain {
    resolvers: Vec<Box<dyn IdentityResolver>>,
}

impl IdentityChain {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Append a strategy; earlier entries take precedence.
    pub fn push(&mut self, resolver: Box<dyn IdentityResolver>) {
        self.resolvers.push(resolver);
    }

    /// Walk the chain and return the first resolved identity.
    pub async fn resolve(&self) -> Option<String> {
        for resolver in &self.resolvers {
            if let Some(email) = resolver.resolve().await {
                tracing::debug!(resolver = resolver.name(), "identity resolved");
                return Some(email);
            }
        }
        None
    }
}
