//! Query, permission and id helpers in the backend's wire format
//!
//! Queries travel as JSON objects, one per `queries[]` parameter:
//! `{"method":"equal","attribute":"status","values":["approved"]}`.

use crate::error::Result;
use crate::types::JsonValue;
use serde::Serialize;
use std::fmt;

/// Placeholder asking the backend to generate a unique id
pub const UNIQUE_ID: &str = "unique()";

/// Field holding the creation timestamp of every row
pub const CREATED_AT: &str = "$createdAt";

/// One query clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<JsonValue>,
}

impl Query {
    fn new(method: &'static str, attribute: Option<String>, values: Vec<JsonValue>) -> Self {
        Self {
            method,
            attribute,
            values,
        }
    }

    /// `attribute == value`
    pub fn equal(attribute: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new("equal", Some(attribute.into()), vec![value.into()])
    }

    /// `attribute` contains the substring `value`
    pub fn contains(attribute: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new("contains", Some(attribute.into()), vec![value.into()])
    }

    /// Maximum number of rows
    pub fn limit(limit: u32) -> Self {
        Self::new("limit", None, vec![limit.into()])
    }

    /// Number of rows to skip
    pub fn offset(offset: u32) -> Self {
        Self::new("offset", None, vec![offset.into()])
    }

    /// Order by `attribute`, newest/largest first
    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::new("orderDesc", Some(attribute.into()), Vec::new())
    }

    /// Query method name
    pub fn method(&self) -> &str {
        self.method
    }

    /// Attribute the clause applies to
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Clause values
    pub fn values(&self) -> &[JsonValue] {
        &self.values
    }

    /// Encode for a `queries[]` parameter
    pub fn to_param(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Who a permission applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Any signed-in user
    Users,
    /// One specific user
    User(String),
}

impl Role {
    /// Shorthand for [`Role::User`]
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Users => f.write_str("users"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

/// A row-level permission, e.g. `read("user:abc")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    action: &'static str,
    role: Role,
}

impl Permission {
    pub fn read(role: Role) -> Self {
        Self { action: "read", role }
    }

    pub fn update(role: Role) -> Self {
        Self {
            action: "update",
            role,
        }
    }

    pub fn delete(role: Role) -> Self {
        Self {
            action: "delete",
            role,
        }
    }

    /// Read/update/delete for a single owner
    pub fn owner(user_id: &str) -> Vec<Self> {
        vec![
            Self::read(Role::user(user_id)),
            Self::update(Role::user(user_id)),
            Self::delete(Role::user(user_id)),
        ]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.action, self.role)
    }
}
