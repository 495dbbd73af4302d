//! Application configuration
//!
//! Loaded from a YAML file (with `{{ env.NAME }}` placeholders rendered
//! first) or, without a file, from `LUQMAH_*` environment variables.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::template::{self, TemplateContext};
use crate::types::{BackoffType, LogLevel, StringMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the backend endpoint
pub const ENV_ENDPOINT: &str = "LUQMAH_ENDPOINT";
/// Environment variable holding the project id
pub const ENV_PROJECT_ID: &str = "LUQMAH_PROJECT_ID";
/// Environment variable holding the database id
pub const ENV_DATABASE_ID: &str = "LUQMAH_DATABASE_ID";
/// Environment variable holding an optional server API key
pub const ENV_API_KEY: &str = "LUQMAH_API_KEY";

/// Rows fetched per page by the list fetchers
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend endpoint, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: String,

    /// Backend project id
    pub project_id: String,

    /// Database holding the restaurant and user tables
    pub database_id: String,

    /// Server API key (optional, only for trusted tooling)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Table names
    #[serde(default)]
    pub tables: TableNames,

    /// Page size for list fetchers
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Deep link sent in password recovery mails
    #[serde(default = "default_recovery_url")]
    pub recovery_url: String,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Default log level for the CLI
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_recovery_url() -> String {
    "halalluqmah://reset".to_string()
}

/// Names of the backend tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    #[serde(default = "default_restaurants_table")]
    pub restaurants: String,
    #[serde(default = "default_users_table")]
    pub users: String,
}

fn default_restaurants_table() -> String {
    "restaurants".to_string()
}

fn default_users_table() -> String {
    "users".to_string()
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            restaurants: default_restaurants_table(),
            users: default_users_table(),
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Client-side rate limit (0 disables it)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_secs() -> u64 {
    60
}

fn default_requests_per_second() -> u32 {
    10
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Create a config with defaults for everything but the identifiers
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            api_key: None,
            tables: TableNames::default(),
            page_size: DEFAULT_PAGE_SIZE,
            recovery_url: default_recovery_url(),
            http: HttpSettings::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Parse YAML, rendering placeholders against `ctx` first
    pub fn from_yaml_str(yaml: &str, ctx: &TemplateContext) -> Result<Self> {
        let rendered = template::render(yaml, ctx)?;
        let config: Self = serde_yaml::from_str(&rendered)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file using the process environment for placeholders
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&contents, &TemplateContext::from_env())
    }

    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_map(&std::env::vars().collect())
    }

    /// Build from an explicit environment map
    pub fn from_env_map(env: &StringMap) -> Result<Self> {
        let required = |key: &str| {
            env.get(key)
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .ok_or_else(|| Error::missing_field(key))
        };

        let mut config = Self::new(
            required(ENV_ENDPOINT)?,
            required(ENV_PROJECT_ID)?,
            required(ENV_DATABASE_ID)?,
        );
        config.api_key = env.get(ENV_API_KEY).filter(|v| !v.is_empty()).cloned();
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::missing_field("endpoint"));
        }
        if self.project_id.trim().is_empty() {
            return Err(Error::missing_field("project_id"));
        }
        if self.database_id.trim().is_empty() {
            return Err(Error::missing_field("database_id"));
        }
        let url = self.endpoint_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        Ok(())
    }

    /// Parsed endpoint URL
    pub fn endpoint_url(&self) -> Result<Url> {
        Ok(Url::parse(self.endpoint.trim())?)
    }

    /// HTTP client config derived from these settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.endpoint.trim().trim_end_matches('/'))
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_secs(self.http.max_backoff_secs),
            )
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Response-Format", "1.7.0");

        builder = if self.http.requests_per_second == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::new(
                self.http.requests_per_second,
                self.http.requests_per_second,
            ))
        };

        builder.build()
    }
}
