//! Identity resolution subsystem.
//!
//! # Data Flow
//! ```text
//! per request:
//!     resolver.rs (ordered chain, first non-empty result wins)
//!         → sources.rs::LoopbackResolver (dev flag AND loopback host)
//!         → sources.rs::SessionResolver  (lookup errors fall through)
//!         → sources.rs::CookieResolver   (URL-decoded cookie value)
//!     → Some(email) → identity header on the outgoing request
//!     → None        → request proceeds unauthenticated
//! ```
//!
//! # Design Decisions
//! - Resolvers read external state but never write it
//! - The development bypass is double-gated and off by default

pub mod resolver;
pub mod sources;

pub use resolver::{IdentityChain, IdentityResolver};
pub use sources::{CookieProvider, SessionProvider};
