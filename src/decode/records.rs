//! Record types stored in the backend tables

use super::types::{FromRow, Identified, RowReader};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Restaurant
// ============================================================================

/// Moderation status of a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestaurantStatus {
    /// Submitted, awaiting review (backend default)
    #[default]
    Pending,
    /// Visible in search
    Approved,
    /// Rejected by a moderator
    Rejected,
}

impl RestaurantStatus {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestaurantStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::decode(format!("unknown restaurant status '{other}'"))),
        }
    }
}

/// A restaurant row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub url: String,
    pub address: Option<String>,
    pub image: Option<String>,
    pub status: RestaurantStatus,
    pub coordinates: Option<String>,
}

impl Identified for Restaurant {
    fn id(&self) -> &str {
        &self.id
    }
}

impl FromRow for Restaurant {
    fn from_row(row: &JsonValue) -> Result<Self> {
        let reader = RowReader::new(row)?;

        let status = match reader.optional_str("status")? {
            None => RestaurantStatus::default(),
            Some(raw) => raw
                .parse()
                .map_err(|_| reader.invalid("status", format!("has unknown value '{raw}'")))?,
        };

        Ok(Self {
            id: reader.id().to_string(),
            name: reader.required_str("name")?,
            url: reader.required_str("url")?,
            address: reader.optional_str("address")?,
            image: reader.optional_str("image")?,
            status,
            coordinates: reader.optional_str("coordinates")?,
        })
    }
}

// ============================================================================
// Account user
// ============================================================================

/// The authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Profile (users table)
// ============================================================================

/// Profile row kept in the users table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: Option<String>,
    /// Rows written before the flag existed count as active
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl FromRow for Profile {
    fn from_row(row: &JsonValue) -> Result<Self> {
        let reader = RowReader::new(row)?;
        Ok(Self {
            name: reader.required_str("name")?,
            email: reader.required_str("email")?,
            mobile_number: reader.optional_str("mobileNumber")?,
            is_active: reader.bool_or("isActive", true)?,
        })
    }
}

// ============================================================================
// Session
// ============================================================================

/// Session returned by an email/password login
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    /// Only populated for server-side logins; browsers rely on the cookie
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub expire: Option<DateTime<Utc>>,
}

// ============================================================================
// Row list
// ============================================================================

/// One page of rows as returned by the list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowList {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub rows: Vec<JsonValue>,
}
