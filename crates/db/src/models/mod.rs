//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` struct matching the database row
//! - A conversion into the matching `campus_core` wire type where one exists
//! - Input DTOs for inserts and updates

pub mod album;
pub mod content_item;
pub mod department;
pub mod department_overview;
pub mod session;
pub mod user;

use campus_core::error::CoreError;

/// Convert a row into its wire type, surfacing a broken row as a decode error.
pub(crate) fn decode<R, T>(row: R) -> Result<T, sqlx::Error>
where
    R: TryInto<T, Error = CoreError>,
{
    row.try_into().map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
