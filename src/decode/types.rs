//! Decoder traits and the field reader shared by all record types

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// A record with a stable backend identifier (`$id`)
pub trait Identified {
    /// The unique identifier
    fn id(&self) -> &str;
}

/// A record that can be decoded from one backend row
pub trait FromRow: Sized {
    /// Validate and convert a row
    fn from_row(row: &JsonValue) -> Result<Self>;
}

/// Decode every row, failing on the first invalid one
pub fn decode_rows<T: FromRow>(rows: &[JsonValue]) -> Result<Vec<T>> {
    rows.iter().map(T::from_row).collect()
}

/// Field-by-field reader that reports which row and field failed
#[derive(Debug)]
pub struct RowReader<'a> {
    fields: &'a JsonObject,
    id: String,
}

impl<'a> RowReader<'a> {
    /// Wrap a row; it must be an object with a string `$id`
    pub fn new(row: &'a JsonValue) -> Result<Self> {
        let fields = row
            .as_object()
            .ok_or_else(|| Error::decode(format!("row is not an object: {row}")))?;

        let id = match fields.get("$id") {
            Some(JsonValue::String(id)) if !id.is_empty() => id.clone(),
            Some(other) => {
                return Err(Error::row_decode(
                    "<unknown>",
                    "$id",
                    format!("must be a non-empty string, got {other}"),
                ))
            }
            None => return Err(Error::row_decode("<unknown>", "$id", "is missing")),
        };

        Ok(Self { fields, id })
    }

    /// The row identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A string field that must be present
    pub fn required_str(&self, field: &str) -> Result<String> {
        match self.fields.get(field) {
            Some(JsonValue::String(value)) => Ok(value.clone()),
            Some(other) => Err(self.invalid(field, format!("must be a string, got {other}"))),
            None => Err(self.invalid(field, "is missing")),
        }
    }

    /// A nullable string field; absent, null and empty all read as `None`
    pub fn optional_str(&self, field: &str) -> Result<Option<String>> {
        match self.fields.get(field) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(value)) if value.is_empty() => Ok(None),
            Some(JsonValue::String(value)) => Ok(Some(value.clone())),
            Some(other) => Err(self.invalid(
                field,
                format!("must be a string or null, got {other}"),
            )),
        }
    }

    /// A boolean field with a default when absent or null
    pub fn bool_or(&self, field: &str, default: bool) -> Result<bool> {
        match self.fields.get(field) {
            None | Some(JsonValue::Null) => Ok(default),
            Some(JsonValue::Bool(value)) => Ok(*value),
            Some(other) => Err(self.invalid(field, format!("must be a boolean, got {other}"))),
        }
    }

    /// Build a decoding error for this row
    pub fn invalid(&self, field: &str, message: impl Into<String>) -> Error {
        Error::row_decode(&self.id, field, message)
    }
}
