//! Row decoding
//!
//! Backend rows arrive as loosely typed JSON. Each record type is decoded
//! exactly once through `FromRow`, which validates every field and reports a
//! typed error naming the offending row and field.

mod records;
mod types;

pub use records::{Profile, Restaurant, RestaurantStatus, RowList, SessionInfo, User};
pub use types::{decode_rows, FromRow, Identified, RowReader};
