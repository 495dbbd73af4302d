//! HTTP client module
//!
//! Provides the transport shared by the account and table services.
//!
//! # Features
//!
//! - **Automatic Retries**: GET/HEAD retried with backoff; writes sent once
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Typed Backend Errors**: Appwrite error bodies become `Error::Backend`
//! - **Authentication**: API key or session secret from the auth module

mod client;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, RetryPolicy,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
