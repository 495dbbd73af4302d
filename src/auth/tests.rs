//! Tests for the auth module

use super::*;
use chrono::{Duration, Utc};

fn request() -> reqwest::RequestBuilder {
    reqwest::Client::new().get("https://example.com/v1/account")
}

#[tokio::test]
async fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let built = auth.apply(request()).await.build().unwrap();

    assert!(built.headers().get(API_KEY_HEADER).is_none());
    assert!(built.headers().get(SESSION_HEADER).is_none());
}

#[tokio::test]
async fn test_api_key_header() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        value: "key-123".to_string(),
    });
    let built = auth.apply(request()).await.build().unwrap();

    assert_eq!(built.headers().get(API_KEY_HEADER).unwrap(), "key-123");
}

#[tokio::test]
async fn test_seeded_session_header() {
    let auth = Authenticator::new(AuthConfig::Session {
        secret: "secret-abc".to_string(),
    });
    assert_eq!(auth.session_secret().await.as_deref(), Some("secret-abc"));

    let built = auth.apply(request()).await.build().unwrap();
    assert_eq!(built.headers().get(SESSION_HEADER).unwrap(), "secret-abc");
}

#[tokio::test]
async fn test_store_and_clear_session() {
    let auth = Authenticator::new(AuthConfig::None);
    auth.store_session(CachedToken::new(
        "s1".to_string(),
        Some(Utc::now() + Duration::hours(1)),
    ))
        .await;
    assert_eq!(auth.session_secret().await.as_deref(), Some("s1"));

    auth.clear_session().await;
    assert_eq!(auth.session_secret().await, None);
}

#[tokio::test]
async fn test_empty_secret_not_cached() {
    let auth = Authenticator::new(AuthConfig::None);
    auth.store_session(CachedToken::new(String::new(), None)).await;
    assert_eq!(auth.session_secret().await, None);
}

#[tokio::test]
async fn test_expired_session_not_applied() {
    let auth = Authenticator::new(AuthConfig::None);
    auth.store_session(CachedToken::new(
        "old".to_string(),
        Some(Utc::now() - Duration::seconds(60)),
    ))
        .await;

    let built = auth.apply(request()).await.build().unwrap();
    assert!(built.headers().get(SESSION_HEADER).is_none());
}

#[tokio::test]
async fn test_clones_share_cache() {
    let auth = Authenticator::new(AuthConfig::None);
    let other = auth.clone();
    auth.store_session(CachedToken::new("shared".to_string(), None))
        .await;
    assert_eq!(other.session_secret().await.as_deref(), Some("shared"));
}
