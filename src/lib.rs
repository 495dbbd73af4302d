// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Luqmah
//!
//! Client core for the Halal Luqmah restaurant directory, backed by an
//! Appwrite project.
//!
//! ## Features
//!
//! - **Paginated lists**: one fetcher for "my restaurants" and "search",
//!   deduplicated by row id, with stale-response protection
//! - **Session service**: login, registration, password recovery, profile
//! - **Redirect policy**: pure routing decision from session state
//! - **HTTP transport**: retry with backoff, rate limiting, session secrets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use luqmah::backend::{self, TableRef};
//! use luqmah::auth::AuthConfig;
//! use luqmah::config::AppConfig;
//! use luqmah::pagination::{ListFetcher, Pager, SearchScope};
//! use luqmah::session::{Session, SessionSettings};
//!
//! #[tokio::main]
//! async fn main() -> luqmah::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let (account, rows) = backend::connect(&config, AuthConfig::None)?;
//!     let session = Session::new(account, rows.clone(), SessionSettings::from(&config));
//!     session.init().await;
//!     session.login("amina@example.com", "secret").await?;
//!
//!     let table = TableRef::new(&config.database_id, &config.tables.restaurants);
//!     let search = ListFetcher::new(rows, table, config.page_size, SearchScope::new("sushi"));
//!     let mut pager = Pager::new();
//!     pager.first();
//!     search
//!         .fetch(&session.state().await, pager.trigger(), pager.page(), || {})
//!         .await;
//!     println!("{:?}", search.state().await.items);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 CLI (clap) / callers                     │
//! └───────────────┬──────────────────────────┬───────────────┘
//!                 │                          │
//! ┌───────────────┴────────┐   ┌─────────────┴──────────────┐
//! │ Session  │  Routing    │   │ ListFetcher<T, Predicate>  │
//! └───────────────┬────────┘   └─────────────┬──────────────┘
//!                 │ AccountApi               │ RowStore
//! ┌───────────────┴──────────────────────────┴───────────────┐
//! │        HttpClient: auth, retry, backoff, rate limit      │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials attached to backend requests
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Backend services (rows, account)
pub mod backend;

/// Row decoding into typed records
pub mod decode;

/// Paginated list fetching
pub mod pagination;

/// Session service
pub mod session;

/// Redirect policy
pub mod routing;

/// Display text helpers
pub mod text;

/// Application configuration
pub mod config;

/// Template interpolation for config files
pub mod template;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::AppConfig;
pub use decode::{Restaurant, RestaurantStatus, User};
pub use pagination::{ListFetcher, MyRestaurants, RestaurantSearch};
pub use session::{Session, SessionState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
