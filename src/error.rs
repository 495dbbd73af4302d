//! Error types for luqmah
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde::Deserialize;
use thiserror::Error;

/// Message shown when a failure carries no readable text
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// The main error type for luqmah
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Session Errors
    // ============================================================================
    #[error("No active session")]
    NotLoggedIn,

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Error body returned by the backend (`{"message", "code", "type"}`)
    #[error("{message}")]
    Backend {
        status: u16,
        kind: Option<String>,
        message: String,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid row '{row_id}': field '{field}' {message}")]
    RowDecode {
        row_id: String,
        field: String,
        message: String,
    },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Shape of an error body returned by the backend
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Classify a non-success response body.
    ///
    /// Appwrite answers with a JSON object carrying `message`; anything else
    /// is kept verbatim as an [`Error::HttpStatus`].
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<BackendErrorBody>(body) {
            Ok(parsed) if !parsed.message.trim().is_empty() => Self::Backend {
                status,
                kind: parsed.kind,
                message: parsed.message,
            },
            _ => Self::http_status(status, body),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a row decoding error
    pub fn row_decode(
        row_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RowDecode {
            row_id: row_id.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } | Error::Backend { status, .. } => {
                is_retryable_status(*status)
            }
            _ => false,
        }
    }

    /// Check if the backend rejected the request for lack of a session
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Error::NotLoggedIn => true,
            Error::HttpStatus { status, .. } | Error::Backend { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Human-readable text suitable for showing to an end user
    pub fn user_message(&self) -> String {
        let message = match self {
            Error::Backend { message, .. } => message.clone(),
            Error::HttpStatus { status, body } if body.trim().is_empty() => {
                format!("HTTP {status}")
            }
            Error::Anyhow(_) => String::new(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for luqmah
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
