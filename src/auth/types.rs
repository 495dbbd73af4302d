//! Auth configuration types

use chrono::{DateTime, Utc};

/// Header carrying a server API key
pub const API_KEY_HEADER: &str = "X-Appwrite-Key";

/// Header carrying a session secret
pub const SESSION_HEADER: &str = "X-Appwrite-Session";

/// Authentication configuration for backend requests
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// Anonymous requests (a session cookie may still be sent by the client)
    #[default]
    None,

    /// Server API key
    ApiKey {
        /// The API key value
        value: String,
    },

    /// Existing session secret, e.g. handed over from another client
    Session {
        /// The session secret
        secret: String,
    },
}

/// Cached session secret with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The session secret
    pub token: String,
    /// When the session expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
