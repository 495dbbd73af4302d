//! In-memory backend doubles shared by unit tests

use crate::backend::{AccountApi, Permission, Query, RowStore, TableRef};
use crate::decode::{RowList, SessionInfo, User};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// A restaurant row as the backend returns it
pub fn restaurant_row(id: &str) -> JsonValue {
    json!({
        "$id": id,
        "name": format!("Restaurant {id}"),
        "url": format!("https://example.com/{id}"),
        "status": "approved",
    })
}

/// `count` restaurant rows with ids `{prefix}{n}`
pub fn restaurant_rows(prefix: &str, count: usize) -> Vec<JsonValue> {
    (0..count)
        .map(|n| restaurant_row(&format!("{prefix}{n}")))
        .collect()
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        created_at: None,
    }
}

/// One queued answer for `list_rows`
enum Reply {
    Rows(Vec<JsonValue>),
    Fail(String),
    Gated(oneshot::Receiver<()>, Vec<JsonValue>),
}

/// Scripted [`RowStore`] that records every call
#[derive(Default)]
pub struct MemoryStore {
    replies: Mutex<VecDeque<Reply>>,
    rows: Mutex<HashMap<String, JsonValue>>,
    list_calls: Mutex<Vec<Vec<Query>>>,
    created: Mutex<Vec<(TableRef, String, JsonValue, Vec<String>)>>,
    updated: Mutex<Vec<(TableRef, String, JsonValue)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page
    pub fn reply_rows(&self, rows: Vec<JsonValue>) {
        self.replies.lock().unwrap().push_back(Reply::Rows(rows));
    }

    /// Queue a failure carrying a backend message
    pub fn reply_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(message.to_string()));
    }

    /// Queue a page that is held until the returned sender fires
    pub fn reply_gated(&self, rows: Vec<JsonValue>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Gated(rx, rows));
        tx
    }

    /// Seed a row for `get_row`
    pub fn put_row(&self, row_id: &str, row: JsonValue) {
        self.rows.lock().unwrap().insert(row_id.to_string(), row);
    }

    pub fn list_calls(&self) -> Vec<Vec<Query>> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(TableRef, String, JsonValue, Vec<String>)> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(TableRef, String, JsonValue)> {
        self.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn list_rows(&self, _table: &TableRef, queries: &[Query]) -> Result<RowList> {
        self.list_calls.lock().unwrap().push(queries.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();

        let rows = match reply {
            None => Vec::new(),
            Some(Reply::Rows(rows)) => rows,
            Some(Reply::Fail(message)) => {
                return Err(Error::Backend {
                    status: 500,
                    kind: Some("general_unknown".to_string()),
                    message,
                })
            }
            Some(Reply::Gated(gate, rows)) => {
                let _ = gate.await;
                rows
            }
        };

        Ok(RowList {
            total: rows.len() as u64,
            rows,
        })
    }

    async fn get_row(&self, _table: &TableRef, row_id: &str) -> Result<JsonValue> {
        self.rows
            .lock()
            .unwrap()
            .get(row_id)
            .cloned()
            .ok_or_else(|| Error::from_response(404, r#"{"message":"Row not found"}"#))
    }

    async fn create_row(
        &self,
        table: &TableRef,
        row_id: &str,
        data: JsonValue,
        permissions: &[Permission],
    ) -> Result<JsonValue> {
        let id = if row_id == crate::backend::UNIQUE_ID {
            format!("row{}", self.created.lock().unwrap().len() + 1)
        } else {
            row_id.to_string()
        };

        let mut row = data.clone();
        if let Some(obj) = row.as_object_mut() {
            obj.insert("$id".to_string(), JsonValue::String(id.clone()));
        }
        self.rows.lock().unwrap().insert(id, row.clone());
        self.created.lock().unwrap().push((
            table.clone(),
            row_id.to_string(),
            data,
            permissions.iter().map(ToString::to_string).collect(),
        ));
        Ok(row)
    }

    async fn update_row(
        &self,
        table: &TableRef,
        row_id: &str,
        data: JsonValue,
    ) -> Result<JsonValue> {
        self.updated
            .lock()
            .unwrap()
            .push((table.clone(), row_id.to_string(), data.clone()));
        Ok(data)
    }
}

/// [`AccountApi`] holding one account and an optional live session
#[derive(Default)]
pub struct FakeAccount {
    password: Mutex<String>,
    account: Mutex<Option<User>>,
    signed_in: Mutex<bool>,
    pub recoveries: Mutex<Vec<(String, String)>>,
    pub password_resets: Mutex<Vec<(String, String, String)>>,
    pub cleared_locally: Mutex<bool>,
}

impl FakeAccount {
    /// An existing account that is not signed in
    pub fn with_account(user: User, password: &str) -> Self {
        Self {
            password: Mutex::new(password.to_string()),
            account: Mutex::new(Some(user)),
            ..Self::default()
        }
    }

    /// An existing account with a live session
    pub fn signed_in(user: User) -> Self {
        let fake = Self::with_account(user, "secret-password");
        *fake.signed_in.lock().unwrap() = true;
        fake
    }

    pub fn is_signed_in(&self) -> bool {
        *self.signed_in.lock().unwrap()
    }
}

fn unauthorized() -> Error {
    Error::from_response(
        401,
        r#"{"message":"User (role: guests) missing scope (account)","type":"general_unauthorized_scope"}"#,
    )
}

#[async_trait]
impl AccountApi for FakeAccount {
    async fn get(&self) -> Result<User> {
        if !self.is_signed_in() {
            return Err(unauthorized());
        }
        self.account.lock().unwrap().clone().ok_or_else(unauthorized)
    }

    async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionInfo> {
        let account = self.account.lock().unwrap().clone();
        match account {
            Some(user) if user.email == email && *self.password.lock().unwrap() == password => {
                *self.signed_in.lock().unwrap() = true;
                Ok(SessionInfo {
                    id: "session1".to_string(),
                    user_id: user.id,
                    secret: "session-secret".to_string(),
                    expire: None,
                })
            }
            _ => Err(Error::from_response(
                401,
                r#"{"message":"Invalid credentials. Please check the email and password.","type":"user_invalid_credentials"}"#,
            )),
        }
    }

    async fn delete_session(&self, _session_id: &str) -> Result<()> {
        if !self.is_signed_in() {
            return Err(unauthorized());
        }
        *self.signed_in.lock().unwrap() = false;
        Ok(())
    }

    async fn create(
        &self,
        _user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User> {
        let mut account = self.account.lock().unwrap();
        if account.as_ref().is_some_and(|u| u.email == email) {
            return Err(Error::from_response(
                409,
                r#"{"message":"A user with the same id, email, or phone already exists in this project.","type":"user_already_exists"}"#,
            ));
        }
        let user = User {
            id: "new-user".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: None,
        };
        // Only one account is modelled; registering replaces it.
        *account = Some(user.clone());
        *self.password.lock().unwrap() = password.to_string();
        Ok(user)
    }

    async fn create_recovery(&self, email: &str, url: &str) -> Result<()> {
        self.recoveries
            .lock()
            .unwrap()
            .push((email.to_string(), url.to_string()));
        Ok(())
    }

    async fn update_recovery(&self, user_id: &str, secret: &str, password: &str) -> Result<()> {
        self.password_resets.lock().unwrap().push((
            user_id.to_string(),
            secret.to_string(),
            password.to_string(),
        ));
        Ok(())
    }

    async fn update_name(&self, name: &str) -> Result<User> {
        let mut account = self.account.lock().unwrap();
        let user = account.as_mut().ok_or_else(unauthorized)?;
        user.name = name.to_string();
        Ok(user.clone())
    }

    async fn clear_local_session(&self) {
        *self.cleared_locally.lock().unwrap() = true;
    }
}
