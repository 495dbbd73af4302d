//! Remote backend services
//!
//! The backend is consumed, never implemented, here. Each service is a trait
//! so the session provider and list fetchers can run against the Appwrite
//! REST implementation or an in-memory stand-in.
//!
//! - [`RowStore`] / [`AppwriteTables`] - row CRUD with filters, paging, ordering
//! - [`AccountApi`] / [`AppwriteAccount`] - sessions, registration, recovery
//! - [`Query`], [`Permission`], [`Role`] - wire-format helpers

mod account;
mod query;
mod tables;

pub use account::{AccountApi, AppwriteAccount};
pub use query::{Permission, Query, Role, CREATED_AT, UNIQUE_ID};
pub use tables::{AppwriteTables, RowStore, TableRef};

use crate::auth::AuthConfig;
use crate::config::AppConfig;
use crate::error::Result;
use crate::http::HttpClient;
use std::sync::Arc;

/// Build both services over one shared HTTP client (and session)
pub fn connect(
    config: &AppConfig,
    auth: AuthConfig,
) -> Result<(Arc<AppwriteAccount>, Arc<AppwriteTables>)> {
    let client = Arc::new(HttpClient::with_auth(config.http_client_config(), auth)?);
    Ok((
        Arc::new(AppwriteAccount::new(Arc::clone(&client))),
        Arc::new(AppwriteTables::new(client)),
    ))
}
