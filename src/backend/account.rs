//! Account service

use crate::auth::CachedToken;
use crate::decode::{SessionInfo, User};
use crate::error::Result;
use crate::http::HttpClient;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Account operations of the backend
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// The account behind the current session
    async fn get(&self) -> Result<User>;

    /// Log in with email and password
    async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionInfo>;

    /// Delete a session (`"current"` for the active one)
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Register a new account
    async fn create(&self, user_id: &str, email: &str, password: &str, name: &str)
        -> Result<User>;

    /// Send a password recovery mail linking to `url`
    async fn create_recovery(&self, email: &str, url: &str) -> Result<()>;

    /// Complete a password recovery
    async fn update_recovery(&self, user_id: &str, secret: &str, password: &str) -> Result<()>;

    /// Change the account display name
    async fn update_name(&self, name: &str) -> Result<User>;

    /// Forget locally cached credentials without calling the backend
    async fn clear_local_session(&self) {}
}

/// [`AccountApi`] over the Appwrite REST API
#[derive(Debug, Clone)]
pub struct AppwriteAccount {
    client: Arc<HttpClient>,
}

impl AppwriteAccount {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountApi for AppwriteAccount {
    async fn get(&self) -> Result<User> {
        self.client.get_json("/account").await
    }

    async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionInfo> {
        let session: SessionInfo = self
            .client
            .send_json(
                Method::POST,
                "/account/sessions/email",
                json!({ "email": email, "password": password }),
            )
            .await?;

        debug!("Session {} created for user {}", session.id, session.user_id);
        self.client
            .authenticator()
            .store_session(CachedToken::new(session.secret.clone(), session.expire))
            .await;
        Ok(session)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.client
            .delete(&format!("/account/sessions/{session_id}"))
            .await?;
        if session_id == "current" {
            self.client.authenticator().clear_session().await;
        }
        Ok(())
    }

    async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User> {
        self.client
            .send_json(
                Method::POST,
                "/account",
                json!({
                    "userId": user_id,
                    "email": email,
                    "password": password,
                    "name": name,
                }),
            )
            .await
    }

    async fn create_recovery(&self, email: &str, url: &str) -> Result<()> {
        let _: Value = self
            .client
            .send_json(
                Method::POST,
                "/account/recovery",
                json!({ "email": email, "url": url }),
            )
            .await?;
        Ok(())
    }

    async fn update_recovery(&self, user_id: &str, secret: &str, password: &str) -> Result<()> {
        let _: Value = self
            .client
            .send_json(
                Method::PUT,
                "/account/recovery",
                json!({ "userId": user_id, "secret": secret, "password": password }),
            )
            .await?;
        Ok(())
    }

    async fn update_name(&self, name: &str) -> Result<User> {
        self.client
            .send_json(Method::PATCH, "/account/name", json!({ "name": name }))
            .await
    }

    async fn clear_local_session(&self) {
        self.client.authenticator().clear_session().await;
    }
}
