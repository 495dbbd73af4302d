//! Session service
//!
//! Owns the signed-in identity and the profile row, and performs every
//! account action. Constructed explicitly and handed to whatever needs it;
//! `init` and `close` bracket its lifetime.

use super::types::{SessionSettings, SessionState};
use crate::backend::{AccountApi, Permission, Role, RowStore, TableRef, UNIQUE_ID};
use crate::decode::{FromRow, Profile, User};
use crate::error::{Error, Result};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Marks the session busy for as long as it lives
struct Submitting<'a>(&'a AtomicBool);

impl<'a> Submitting<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The signed-in session and the actions available on it
pub struct Session {
    account: Arc<dyn AccountApi>,
    rows: Arc<dyn RowStore>,
    users: TableRef,
    restaurants: TableRef,
    recovery_url: String,
    state: RwLock<SessionState>,
    profile: RwLock<Profile>,
    submitting: AtomicBool,
}

impl Session {
    /// Create a session service; nothing is fetched until [`Session::init`]
    pub fn new(
        account: Arc<dyn AccountApi>,
        rows: Arc<dyn RowStore>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            account,
            rows,
            users: TableRef::new(&settings.database_id, settings.users_table),
            restaurants: TableRef::new(settings.database_id, settings.restaurants_table),
            recovery_url: settings.recovery_url,
            state: RwLock::new(SessionState::default()),
            profile: RwLock::new(Profile::default()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Restore an existing session, if the backend still has one
    pub async fn init(&self) -> SessionState {
        let user = match self.account.get().await {
            Ok(user) => {
                info!("Restored session for {}", user.email);
                Some(user)
            }
            Err(e) if e.is_unauthorized() => {
                debug!("No existing session: {e}");
                None
            }
            Err(e) => {
                warn!("Could not restore session: {e}");
                None
            }
        };

        let state = SessionState {
            user,
            loading: false,
        };
        *self.state.write().await = state.clone();
        self.refresh_profile().await;
        state
    }

    /// Drop identity and cached credentials locally; the backend session is
    /// left alone (use [`Session::logout`] to end it)
    pub async fn close(&self) {
        self.account.clear_local_session().await;
        *self.state.write().await = SessionState::anonymous();
        *self.profile.write().await = Profile::default();
    }

    /// Snapshot for list fetchers and the redirect policy
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn profile(&self) -> Profile {
        self.profile.read().await.clone()
    }

    /// Check if an action is in flight
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// The restaurants table this session writes to
    pub fn restaurants_table(&self) -> &TableRef {
        &self.restaurants
    }

    // ========================================================================
    // Auth actions
    // ========================================================================

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let _busy = Submitting::start(&self.submitting);
        let user = self.login_inner(email, password).await?;
        self.refresh_profile().await;
        Ok(user)
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<User> {
        let result = match self
            .account
            .create_email_password_session(email, password)
            .await
        {
            Ok(_) => self.account.get().await,
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(user) => {
                info!("Logged in as {}", user.email);
                state.user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                state.user = None;
                Err(e)
            }
        }
    }

    /// End the current session
    pub async fn logout(&self) -> Result<()> {
        let _busy = Submitting::start(&self.submitting);
        self.account.delete_session("current").await?;
        *self.state.write().await = SessionState::anonymous();
        *self.profile.write().await = Profile::default();
        info!("Logged out successfully");
        Ok(())
    }

    /// Create an account, sign in, and create its profile row
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        mobile_number: Option<&str>,
    ) -> Result<User> {
        let _busy = Submitting::start(&self.submitting);

        let user = self.account.create(UNIQUE_ID, email, password, name).await?;
        self.login_inner(email, password).await?;

        self.rows
            .create_row(
                &self.users,
                &user.id,
                json!({
                    "name": name,
                    "email": email,
                    "mobileNumber": mobile_number.unwrap_or(""),
                    "isActive": true,
                }),
                &Permission::owner(&user.id),
            )
            .await?;

        self.refresh_profile().await;
        Ok(user)
    }

    /// Send a password recovery mail
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let _busy = Submitting::start(&self.submitting);
        self.account
            .create_recovery(email, &self.recovery_url)
            .await
    }

    /// Set a new password using the secret from the recovery mail
    pub async fn update_password(&self, user_id: &str, secret: &str, password: &str) -> Result<()> {
        let _busy = Submitting::start(&self.submitting);
        self.account
            .update_recovery(user_id, secret, password)
            .await
    }

    // ========================================================================
    // Profile and restaurant actions
    // ========================================================================

    /// Update the account name and the profile row; no-op when signed out
    pub async fn update_profile(
        &self,
        email: &str,
        name: &str,
        mobile_number: Option<&str>,
    ) -> Result<()> {
        let _busy = Submitting::start(&self.submitting);
        let Some(user) = self.user().await else {
            debug!("update_profile without a user, ignoring");
            return Ok(());
        };

        self.account.update_name(name).await?;
        self.rows
            .update_row(
                &self.users,
                &user.id,
                json!({
                    "name": name,
                    "email": email,
                    "mobileNumber": mobile_number.unwrap_or(""),
                }),
            )
            .await?;

        let mut profile = self.profile.write().await;
        profile.name = name.to_string();
        profile.email = email.to_string();
        profile.mobile_number = mobile_number.filter(|m| !m.is_empty()).map(str::to_string);
        Ok(())
    }

    /// Submit a restaurant; returns the new row id, or `None` when signed out
    pub async fn add_restaurant(&self, name: &str, url: &str) -> Result<Option<String>> {
        let _busy = Submitting::start(&self.submitting);
        let Some(user) = self.user().await else {
            debug!("add_restaurant without a user, ignoring");
            return Ok(None);
        };

        let permissions = [
            Permission::read(Role::Users),
            Permission::update(Role::user(&user.id)),
            Permission::delete(Role::user(&user.id)),
        ];

        let row = self
            .rows
            .create_row(
                &self.restaurants,
                UNIQUE_ID,
                json!({ "name": name, "url": url, "users": user.id }),
                &permissions,
            )
            .await?;

        let id = row
            .get("$id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::decode("created row has no $id"))?;
        info!("Added restaurant {id}");
        Ok(Some(id.to_string()))
    }

    /// Reload the profile row for the current user; failures are logged only
    async fn refresh_profile(&self) {
        let Some(user) = self.user().await else {
            *self.profile.write().await = Profile::default();
            return;
        };

        let loaded = match self.rows.get_row(&self.users, &user.id).await {
            Ok(row) => Profile::from_row(&row),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(profile) => *self.profile.write().await = profile,
            Err(e) => error!("Error fetching user profile: {e}"),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("users", &self.users)
            .field("restaurants", &self.restaurants)
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}
