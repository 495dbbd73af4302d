//! CLI runner - executes commands

use crate::auth::AuthConfig;
use crate::backend::{self, RowStore, TableRef};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::decode::{Restaurant, User};
use crate::error::{Error, Result};
use crate::pagination::{
    FetchOutcome, FetchState, ListFetcher, ListPredicate, OwnerScope, Pager, SearchScope,
    SkipReason,
};
use crate::routing::decide_redirect;
use crate::session::{Session, SessionSettings, SessionState};
use crate::text::to_title_case;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let (account, tables) = backend::connect(&config, self.auth_config(&config))?;
        let rows: Arc<dyn RowStore> = tables;
        let session = Session::new(account, Arc::clone(&rows), SessionSettings::from(&config));

        let result = self.dispatch(&config, &session, rows).await;
        session.close().await;
        result
    }

    async fn dispatch(
        &self,
        config: &AppConfig,
        session: &Session,
        rows: Arc<dyn RowStore>,
    ) -> Result<()> {
        match &self.cli.command {
            Commands::Register { name, mobile } => {
                let (email, password) = self.credentials()?;
                session.init().await;
                let user = session
                    .register(email, password, name, mobile.as_deref())
                    .await?;
                self.output_user(&user)
            }
            Commands::Forgot => {
                let email = self
                    .cli
                    .email
                    .as_deref()
                    .ok_or_else(|| Error::config("--email is required"))?;
                session.forgot_password(email).await?;
                self.output_status("recovery_sent", &format!("Recovery mail sent to {email}"))
            }
            Commands::Reset {
                user_id,
                secret,
                new_password,
            } => {
                session
                    .update_password(user_id, secret, new_password)
                    .await?;
                self.output_status("password_updated", "Password updated, please log in")
            }
            command => {
                let state = self.sign_in(session).await?;
                self.signed_in_command(command, config, session, &state, rows)
                    .await
            }
        }
    }

    async fn signed_in_command(
        &self,
        command: &Commands,
        config: &AppConfig,
        session: &Session,
        state: &SessionState,
        rows: Arc<dyn RowStore>,
    ) -> Result<()> {
        let table = TableRef::new(&config.database_id, &config.tables.restaurants);

        match command {
            Commands::Whoami => {
                let user = state.user.as_ref().ok_or(Error::NotLoggedIn)?;
                self.output_user(user)
            }
            Commands::Search { term, pages } => {
                let fetcher =
                    ListFetcher::new(rows, table, config.page_size, SearchScope::new(term));
                let list = load_pages(&fetcher, state, *pages).await?;
                self.output_restaurants(&list)
            }
            Commands::Mine { pages } => {
                let fetcher = ListFetcher::new(rows, table, config.page_size, OwnerScope);
                let list = load_pages(&fetcher, state, *pages).await?;
                self.output_restaurants(&list)
            }
            Commands::Add { name, url } => {
                let id = session
                    .add_restaurant(name, url)
                    .await?
                    .ok_or(Error::NotLoggedIn)?;
                self.output_status("restaurant_added", &format!("Submitted for review ({id})"))
            }
            Commands::Profile => {
                require_user(state)?;
                let profile = session.profile().await;
                match self.cli.format {
                    OutputFormat::Json => emit_json(&profile),
                    OutputFormat::Pretty => {
                        println!("Name:   {}", to_title_case(Some(profile.name.as_str())));
                        println!("Email:  {}", profile.email);
                        println!(
                            "Mobile: {}",
                            profile.mobile_number.as_deref().unwrap_or("-")
                        );
                        if !profile.is_active {
                            println!("Status: inactive");
                        }
                        Ok(())
                    }
                }
            }
            Commands::UpdateProfile {
                name,
                contact_email,
                mobile,
            } => {
                let user = require_user(state)?;
                let email = contact_email.as_deref().unwrap_or(&user.email);
                session
                    .update_profile(email, name, mobile.as_deref())
                    .await?;
                self.output_status("profile_updated", "Profile updated")
            }
            Commands::Logout => {
                require_user(state)?;
                session.logout().await?;
                self.output_status("logged_out", "Logged out")
            }
            Commands::Route { path } => {
                let target = decide_redirect(state, path);
                match self.cli.format {
                    OutputFormat::Json => emit_json(&json!({
                        "route": path,
                        "redirect": target.as_ref().map(|r| r.path()),
                    })),
                    OutputFormat::Pretty => {
                        match target {
                            Some(route) => println!("{path} -> {route}"),
                            None => println!("{path} (no redirect)"),
                        }
                        Ok(())
                    }
                }
            }
            Commands::Register { .. } | Commands::Forgot | Commands::Reset { .. } => {
                Err(Error::Other("command does not need a session".to_string()))
            }
        }
    }

    /// Load configuration from `--config` or the environment
    fn load_config(&self) -> Result<AppConfig> {
        match &self.cli.config {
            Some(path) => AppConfig::from_file(path),
            None => AppConfig::from_env(),
        }
    }

    /// Pick credentials for the transport: session secret, then API key
    fn auth_config(&self, config: &AppConfig) -> AuthConfig {
        if let Some(secret) = &self.cli.session {
            AuthConfig::Session {
                secret: secret.clone(),
            }
        } else if let Some(key) = &config.api_key {
            AuthConfig::ApiKey { value: key.clone() }
        } else {
            AuthConfig::None
        }
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.cli.email.as_deref(), self.cli.password.as_deref()) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(Error::config("--email and --password are required")),
        }
    }

    /// Restore a session, signing in with the given credentials when none exists
    async fn sign_in(&self, session: &Session) -> Result<SessionState> {
        let state = session.init().await;
        if state.user.is_some() {
            return Ok(state);
        }

        if let Ok((email, password)) = self.credentials() {
            debug!("Signing in as {email}");
            session.login(email, password).await?;
        }
        Ok(session.state().await)
    }

    // ========================================================================
    // Output
    // ========================================================================

    fn output_user(&self, user: &User) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => emit_json(user),
            OutputFormat::Pretty => {
                println!("{} <{}>", to_title_case(Some(user.name.as_str())), user.email);
                println!("id: {}", user.id);
                Ok(())
            }
        }
    }

    fn output_status(&self, status: &str, message: &str) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => emit_json(&json!({ "status": status, "message": message })),
            OutputFormat::Pretty => {
                println!("{message}");
                Ok(())
            }
        }
    }

    fn output_restaurants(&self, list: &FetchState<Restaurant>) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => emit_json(&RestaurantPage {
                items: &list.items,
                error: list.error.as_deref(),
            }),
            OutputFormat::Pretty => {
                for restaurant in &list.items {
                    println!("{}", format_restaurant(restaurant));
                }
                if let Some(error) = &list.error {
                    eprintln!("{error}");
                }
                Ok(())
            }
        }
    }
}

/// JSON shape of a loaded list
#[derive(Serialize)]
struct RestaurantPage<'a> {
    items: &'a [Restaurant],
    error: Option<&'a str>,
}

/// Print `value` as one JSON line
fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn require_user(state: &SessionState) -> Result<&User> {
    state.user.as_ref().ok_or(Error::NotLoggedIn)
}

/// One line per restaurant: title-cased name, status, link
pub(crate) fn format_restaurant(restaurant: &Restaurant) -> String {
    let mut line = format!(
        "{}  [{}]  {}",
        to_title_case(Some(restaurant.name.as_str())),
        restaurant.status,
        restaurant.url
    );
    if let Some(address) = &restaurant.address {
        line.push_str("  ");
        line.push_str(address);
    }
    line
}

/// Drive a fetcher through up to `pages` pages, stepping back on failure.
///
/// Stops early when a page comes back short or a cycle fails.
pub(crate) async fn load_pages<P: ListPredicate>(
    fetcher: &ListFetcher<Restaurant, P>,
    state: &SessionState,
    pages: u32,
) -> Result<FetchState<Restaurant>> {
    let mut pager = Pager::new();

    for n in 0..pages.max(1) {
        if n == 0 {
            pager.first();
        } else {
            pager.next();
        }

        let mut failed = false;
        let outcome = fetcher
            .fetch(state, pager.trigger(), pager.page(), || failed = true)
            .await;
        if failed {
            pager.step_back();
        }

        match outcome {
            FetchOutcome::Applied { fetched, .. } => {
                if (fetched as u32) < fetcher.page_size() {
                    break;
                }
            }
            FetchOutcome::Skipped(reason) => return Err(skip_error(reason)),
            FetchOutcome::Failed(message) => {
                warn!("Stopped at page {}: {message}", pager.page() + 1);
                break;
            }
            FetchOutcome::Idle | FetchOutcome::Superseded => break,
        }
    }

    Ok(fetcher.state().await)
}

fn skip_error(reason: SkipReason) -> Error {
    match reason {
        SkipReason::SessionLoading | SkipReason::NoSession => Error::NotLoggedIn,
        SkipReason::BlankSearchTerm => Error::config("search term must not be blank"),
        SkipReason::InvalidPage => Error::config("page numbers start at 1"),
    }
}
