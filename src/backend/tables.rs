//! Row storage service

use super::query::{Permission, Query};
use crate::decode::RowList;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::JsonValue;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Identifies one table inside one database
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub database_id: String,
    pub table_id: String,
}

impl TableRef {
    pub fn new(database_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            table_id: table_id.into(),
        }
    }

    fn rows_path(&self) -> String {
        format!(
            "/tablesdb/{}/tables/{}/rows",
            self.database_id, self.table_id
        )
    }

    fn row_path(&self, row_id: &str) -> String {
        format!("{}/{row_id}", self.rows_path())
    }
}

/// Row-oriented CRUD against the remote data service
#[async_trait]
pub trait RowStore: Send + Sync {
    /// List rows matching `queries` (filters, limit, offset, ordering)
    async fn list_rows(&self, table: &TableRef, queries: &[Query]) -> Result<RowList>;

    /// Fetch one row by id
    async fn get_row(&self, table: &TableRef, row_id: &str) -> Result<JsonValue>;

    /// Create a row; `row_id` may be [`super::UNIQUE_ID`]
    async fn create_row(
        &self,
        table: &TableRef,
        row_id: &str,
        data: JsonValue,
        permissions: &[Permission],
    ) -> Result<JsonValue>;

    /// Patch the given fields of a row
    async fn update_row(&self, table: &TableRef, row_id: &str, data: JsonValue)
        -> Result<JsonValue>;
}

/// [`RowStore`] over the Appwrite `TablesDB` REST API
#[derive(Debug, Clone)]
pub struct AppwriteTables {
    client: Arc<HttpClient>,
}

impl AppwriteTables {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RowStore for AppwriteTables {
    async fn list_rows(&self, table: &TableRef, queries: &[Query]) -> Result<RowList> {
        // One page, one request: a failed page is reported, never replayed
        let mut config = RequestConfig::new().retries(0);
        for query in queries {
            config = config.query("queries[]", query.to_param()?);
        }
        debug!(
            "Listing rows of {}/{} ({} queries)",
            table.database_id,
            table.table_id,
            queries.len()
        );
        self.client
            .get_json_with_config(&table.rows_path(), config)
            .await
    }

    async fn get_row(&self, table: &TableRef, row_id: &str) -> Result<JsonValue> {
        self.client.get_json(&table.row_path(row_id)).await
    }

    async fn create_row(
        &self,
        table: &TableRef,
        row_id: &str,
        data: JsonValue,
        permissions: &[Permission],
    ) -> Result<JsonValue> {
        let permissions: Vec<String> = permissions.iter().map(ToString::to_string).collect();
        let body = json!({
            "rowId": row_id,
            "data": data,
            "permissions": permissions,
        });
        self.client
            .send_json(Method::POST, &table.rows_path(), body)
            .await
    }

    async fn update_row(
        &self,
        table: &TableRef,
        row_id: &str,
        data: JsonValue,
    ) -> Result<JsonValue> {
        self.client
            .send_json(Method::PATCH, &table.row_path(row_id), json!({ "data": data }))
            .await
    }
}
