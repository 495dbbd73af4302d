//! Authentication module
//!
//! Supports: anonymous, server API key, session secret.
//!
//! The `Authenticator` attaches credentials to every backend request and
//! caches the session secret obtained at login until logout or expiry.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, API_KEY_HEADER, SESSION_HEADER};

#[cfg(test)]
mod tests;
