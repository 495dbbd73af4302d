//! Tests for the session service

use super::*;
use crate::backend::{AccountApi, RowStore};
use crate::decode::Profile;
use crate::testing::{user, FakeAccount, MemoryStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn settings() -> SessionSettings {
    SessionSettings {
        database_id: "main".to_string(),
        users_table: "users".to_string(),
        restaurants_table: "restaurants".to_string(),
        recovery_url: "halalluqmah://reset".to_string(),
    }
}

fn session_with(account: &Arc<FakeAccount>, store: &Arc<MemoryStore>) -> Session {
    let account: Arc<dyn AccountApi> = account.clone();
    let rows: Arc<dyn RowStore> = store.clone();
    Session::new(account, rows, settings())
}

// ============================================================================
// State
// ============================================================================

#[test]
fn test_state_defaults_to_loading() {
    let state = SessionState::default();
    assert!(state.loading);
    assert!(state.user.is_none());
    assert!(!state.is_established());

    assert!(!SessionState::anonymous().loading);
    assert!(SessionState::signed_in(user("u1")).is_established());
}

#[test]
fn test_settings_from_config() {
    let config = crate::config::AppConfig::new("https://cloud.appwrite.io/v1", "proj", "main");
    let settings = SessionSettings::from(&config);
    assert_eq!(settings.database_id, "main");
    assert_eq!(settings.users_table, config.tables.users);
    assert_eq!(settings.restaurants_table, config.tables.restaurants);
    assert_eq!(settings.recovery_url, "halalluqmah://reset");
}

#[tokio::test]
async fn test_state_before_init_is_loading() {
    let session = session_with(&Arc::new(FakeAccount::default()), &Arc::new(MemoryStore::new()));
    assert!(session.state().await.loading);
    assert!(!session.is_submitting());
}

// ============================================================================
// Init
// ============================================================================

#[tokio::test]
async fn test_init_restores_user_and_profile() {
    let account = Arc::new(FakeAccount::signed_in(user("u1")));
    let store = Arc::new(MemoryStore::new());
    store.put_row(
        "u1",
        json!({ "$id": "u1", "name": "Amina", "email": "u1@example.com", "mobileNumber": "0400" }),
    );
    let session = session_with(&account, &store);

    let state = session.init().await;

    assert!(!state.loading);
    assert_eq!(state.user.map(|u| u.id), Some("u1".to_string()));
    assert_eq!(
        session.profile().await,
        Profile {
            name: "Amina".to_string(),
            email: "u1@example.com".to_string(),
            mobile_number: Some("0400".to_string()),
            is_active: true,
        }
    );
}

#[tokio::test]
async fn test_init_without_session_is_anonymous() {
    let account = Arc::new(FakeAccount::with_account(user("u1"), "pw"));
    let session = session_with(&account, &Arc::new(MemoryStore::new()));

    let state = session.init().await;

    assert_eq!(state, SessionState::anonymous());
    assert_eq!(session.profile().await, Profile::default());
}

#[tokio::test]
async fn test_missing_profile_row_keeps_user() {
    let account = Arc::new(FakeAccount::signed_in(user("u1")));
    let session = session_with(&account, &Arc::new(MemoryStore::new()));

    let state = session.init().await;

    assert!(state.is_established());
    assert_eq!(session.profile().await, Profile::default());
}

// ============================================================================
// Login / logout
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let account = Arc::new(FakeAccount::with_account(user("u1"), "pw"));
    let session = session_with(&account, &Arc::new(MemoryStore::new()));
    session.init().await;

    let logged_in = session.login("u1@example.com", "pw").await.unwrap();

    assert_eq!(logged_in.id, "u1");
    assert!(session.state().await.is_established());
    assert!(!session.is_submitting());
}

#[tokio::test]
async fn test_login_failure_clears_user() {
    let account = Arc::new(FakeAccount::with_account(user("u1"), "pw"));
    let session = session_with(&account, &Arc::new(MemoryStore::new()));
    session.init().await;

    let err = session.login("u1@example.com", "wrong").await.unwrap_err();

    assert_eq!(
        err.user_message(),
        "Invalid credentials. Please check the email and password."
    );
    let state = session.state().await;
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert!(!session.is_submitting());
}

#[tokio::test]
async fn test_logout_clears_state() {
    let account = Arc::new(FakeAccount::signed_in(user("u1")));
    let session = session_with(&account, &Arc::new(MemoryStore::new()));
    session.init().await;

    session.logout().await.unwrap();

    assert_eq!(session.state().await, SessionState::anonymous());
    assert!(!account.is_signed_in());
}

#[tokio::test]
async fn test_logout_failure_keeps_user() {
    let account = Arc::new(FakeAccount::with_account(user("u1"), "pw"));
    let session = session_with(&account, &Arc::new(MemoryStore::new()));
    session.init().await;

    assert!(session.logout().await.is_err());
    assert!(!session.is_submitting());
}

#[tokio::test]
async fn test_close_clears_local_state_only() {
    let account = Arc::new(FakeAccount::signed_in(user("u1")));
    let session = session_with(&account, &Arc::new(MemoryStore::new()));
    session.init().await;

    session.close().await;

    assert_eq!(session.state().await, SessionState::anonymous());
    assert!(*account.cleared_locally.lock().unwrap());
    assert!(account.is_signed_in());
}

// ============================================================================
// Register / recovery
// ============================================================================

#[tokio::test]
async fn test_register_creates_profile_row() {
    let account = Arc::new(FakeAccount::default());
    let store = Arc::new(MemoryStore::new());
    let session = session_with(&account, &store);
    session.init().await;

    let created = session
        .register("new@example.com", "pw12345678", "Yusuf", Some("0400"))
        .await
        .unwrap();

    assert_eq!(created.id, "new-user");
    assert!(session.state().await.is_established());

    let rows = store.created();
    assert_eq!(rows.len(), 1);
    let (table, row_id, data, permissions) = &rows[0];
    assert_eq!(table.table_id, "users");
    assert_eq!(row_id, "new-user");
    assert_eq!(
        data,
        &json!({
            "name": "Yusuf",
            "email": "new@example.com",
            "mobileNumber": "0400",
            "isActive": true,
        })
    );
    assert_eq!(
        permissions,
        &vec![
            r#"read("user:new-user")"#.to_string(),
            r#"update("user:new-user")"#.to_string(),
            r#"delete("user:new-user")"#.to_string(),
        ]
    );
    assert_eq!(session.profile().await.name, "Yusuf");
}

#[tokio::test]
async fn test_register_duplicate_email_fails() {
    let account = Arc::new(FakeAccount::with_account(user("u1"), "pw"));
    let store = Arc::new(MemoryStore::new());
    let session = session_with(&account, &store);

    let err = session
        .register("u1@example.com", "pw", "Dup", None)
        .await
        .unwrap_err();

    assert!(err.user_message().contains("already exists"));
    assert!(store.created().is_empty());
}

#[tokio::test]
async fn test_forgot_password_uses_recovery_url() {
    let account = Arc::new(FakeAccount::default());
    let session = session_with(&account, &Arc::new(MemoryStore::new()));

    session.forgot_password("a@example.com").await.unwrap();

    assert_eq!(
        *account.recoveries.lock().unwrap(),
        vec![(
            "a@example.com".to_string(),
            "halalluqmah://reset".to_string()
        )]
    );
}

#[tokio::test]
async fn test_update_password() {
    let account = Arc::new(FakeAccount::default());
    let session = session_with(&account, &Arc::new(MemoryStore::new()));

    session
        .update_password("u1", "recovery-secret", "new-password")
        .await
        .unwrap();

    assert_eq!(
        account.password_resets.lock().unwrap()[0],
        (
            "u1".to_string(),
            "recovery-secret".to_string(),
            "new-password".to_string()
        )
    );
}

// ============================================================================
// Profile and restaurants
// ============================================================================

#[tokio::test]
async fn test_update_profile() {
    let account = Arc::new(FakeAccount::signed_in(user("u1")));
    let store = Arc::new(MemoryStore::new());
    let session = session_with(&account, &store);
    session.init().await;

    session
        .update_profile("u1@example.com", "Amina K", None)
        .await
        .unwrap();

    let updated = store.updated();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].1, "u1");
    assert_eq!(
        updated[0].2,
        json!({ "name": "Amina K", "email": "u1@example.com", "mobileNumber": "" })
    );
    assert_eq!(session.profile().await.name, "Amina K");
    assert_eq!(session.profile().await.mobile_number, None);
}

#[tokio::test]
async fn test_update_profile_keeps_active_flag() {
    let account = Arc::new(FakeAccount::signed_in(user("u1")));
    let store = Arc::new(MemoryStore::new());
    store.put_row(
        "u1",
        json!({ "$id": "u1", "name": "Amina", "email": "u1@example.com", "isActive": false }),
    );
    let session = session_with(&account, &store);
    session.init().await;
    assert!(!session.profile().await.is_active);

    session
        .update_profile("u1@example.com", "Amina K", Some("0400"))
        .await
        .unwrap();

    let profile = session.profile().await;
    assert_eq!(profile.name, "Amina K");
    assert_eq!(profile.mobile_number.as_deref(), Some("0400"));
    assert!(!profile.is_active);
}

#[tokio::test]
async fn test_update_profile_signed_out_is_noop() {
    let account = Arc::new(FakeAccount::default());
    let store = Arc::new(MemoryStore::new());
    let session = session_with(&account, &store);
    session.init().await;

    session.update_profile("x@example.com", "X", None).await.unwrap();

    assert!(store.updated().is_empty());
}

#[tokio::test]
async fn test_add_restaurant() {
    let account = Arc::new(FakeAccount::signed_in(user("u1")));
    let store = Arc::new(MemoryStore::new());
    let session = session_with(&account, &store);
    session.init().await;

    let id = session
        .add_restaurant("Saffron House", "https://saffron.example.com")
        .await
        .unwrap();

    assert_eq!(id.as_deref(), Some("row1"));
    let (table, row_id, data, permissions) = &store.created()[0];
    assert_eq!(table, session.restaurants_table());
    assert_eq!(row_id, crate::backend::UNIQUE_ID);
    assert_eq!(
        data,
        &json!({ "name": "Saffron House", "url": "https://saffron.example.com", "users": "u1" })
    );
    assert_eq!(
        permissions,
        &vec![
            r#"read("users")"#.to_string(),
            r#"update("user:u1")"#.to_string(),
            r#"delete("user:u1")"#.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_add_restaurant_signed_out_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(&Arc::new(FakeAccount::default()), &store);
    session.init().await;

    let id = session.add_restaurant("X", "https://x.example.com").await.unwrap();

    assert_eq!(id, None);
    assert!(store.created().is_empty());
}
