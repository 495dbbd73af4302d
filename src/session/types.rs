//! Session snapshot and settings

use crate::config::AppConfig;
use crate::decode::User;

/// Who is signed in, and whether that is known yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True until the startup session check has finished
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    /// Settled state with nobody signed in
    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    /// Settled state with `user` signed in
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    /// Check if the check finished with a user present
    pub fn is_established(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}

/// Table and deep-link settings used by the session actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub database_id: String,
    pub users_table: String,
    pub restaurants_table: String,
    pub recovery_url: String,
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            database_id: config.database_id.clone(),
            users_table: config.tables.users.clone(),
            restaurants_table: config.tables.restaurants.clone(),
            recovery_url: config.recovery_url.clone(),
        }
    }
}
