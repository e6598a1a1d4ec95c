//! The JSON API route handlers, one module per resource.

pub mod categories;
pub mod expenses;
pub mod users;

use crate::{Error, user::UserID};

/// Unwrap a field that is required in a request body.
///
/// # Errors
///
/// Returns an [Error::InvalidRequest] naming `field_name` if `field` is `None`.
fn required<T>(field: Option<T>, field_name: &str) -> Result<T, Error> {
    field.ok_or_else(|| Error::InvalidRequest(format!("{field_name} is required")))
}

/// The ID of the user that owns the resource in a request body.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if `user_id` is missing or not a positive integer.
fn owner_id(user_id: Option<i64>) -> Result<UserID, Error> {
    user_id
        .filter(|&id| id > 0)
        .map(UserID::new)
        .ok_or(Error::Unauthorized)
}
