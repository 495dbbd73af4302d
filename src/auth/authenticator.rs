//! Authenticator implementation
//!
//! Applies the API key or the current session secret to outgoing requests.

use super::types::{AuthConfig, CachedToken, API_KEY_HEADER, SESSION_HEADER};
use reqwest::RequestBuilder;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Clone)]
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Session secret obtained at login (or seeded from config)
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        let seeded = match &config {
            AuthConfig::Session { secret } if !secret.is_empty() => {
                Some(CachedToken::new(secret.clone(), None))
            }
            _ => None,
        };

        Self {
            config,
            cached_token: Arc::new(RwLock::new(seeded)),
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        let req = match &self.config {
            AuthConfig::ApiKey { value } => req.header(API_KEY_HEADER, value),
            AuthConfig::None | AuthConfig::Session { .. } => req,
        };

        match self.session_secret().await {
            Some(secret) => req.header(SESSION_HEADER, secret),
            None => req,
        }
    }

    /// Current session secret, if one is cached and still valid
    pub async fn session_secret(&self) -> Option<String> {
        let cached = self.cached_token.read().await;
        cached
            .as_ref()
            .filter(|token| !token.is_expired())
            .map(|token| token.token.clone())
    }

    /// Remember the session secret returned by a login
    pub async fn store_session(&self, token: CachedToken) {
        if token.token.is_empty() {
            // Browser-style sessions come back without a secret; the cookie
            // store carries them instead.
            return;
        }
        debug!("Caching session secret (expires {:?})", token.expires_at);
        *self.cached_token.write().await = Some(token);
    }

    /// Forget the cached session secret
    pub async fn clear_session(&self) {
        *self.cached_token.write().await = None;
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.config {
            AuthConfig::None => "none",
            AuthConfig::ApiKey { .. } => "api_key",
            AuthConfig::Session { .. } => "session",
        };
        f.debug_struct("Authenticator")
            .field("config", &kind)
            .finish_non_exhaustive()
    }
}
