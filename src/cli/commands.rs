//! CLI commands and argument parsing

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

/// Halal Luqmah restaurant directory client
#[derive(Parser, Debug)]
#[command(name = "luqmah")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); falls back to LUQMAH_* environment variables
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Account email used to sign in before running the command
    #[arg(short, long, global = true, env = "LUQMAH_EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(short, long, global = true, env = "LUQMAH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Existing session secret to reuse instead of signing in
    #[arg(long, global = true, env = "LUQMAH_SESSION", hide_env_values = true)]
    pub session: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level: `--verbose` wins, then the config file, then INFO
    pub fn log_level(&self) -> Level {
        if self.verbose {
            return Level::DEBUG;
        }
        self.config
            .as_ref()
            .and_then(|path| AppConfig::from_file(path).ok())
            .map_or(Level::INFO, |config| config.log_level.into())
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the signed-in account
    Whoami,

    /// Search approved restaurants
    Search {
        /// Search term
        term: String,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// List restaurants you added, newest first
    Mine {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Submit a restaurant for review
    Add {
        /// Restaurant name
        name: String,

        /// Restaurant website or map link
        url: String,
    },

    /// Show your profile
    Profile,

    /// Update your profile
    UpdateProfile {
        /// Display name
        #[arg(long)]
        name: String,

        /// Contact email stored on the profile (defaults to the account email)
        #[arg(long)]
        contact_email: Option<String>,

        /// Mobile number
        #[arg(long)]
        mobile: Option<String>,
    },

    /// Create an account (uses --email and --password)
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Mobile number
        #[arg(long)]
        mobile: Option<String>,
    },

    /// Send a password recovery mail (uses --email)
    Forgot,

    /// Complete a password recovery
    Reset {
        /// User id from the recovery link
        #[arg(long)]
        user_id: String,

        /// Secret from the recovery link
        #[arg(long)]
        secret: String,

        /// New password
        #[arg(long, env = "LUQMAH_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },

    /// End the current session
    Logout,

    /// Show where a route would redirect for the current session
    Route {
        /// Route path, e.g. /login
        #[arg(default_value = "/")]
        path: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
