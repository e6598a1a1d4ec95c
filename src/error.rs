//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not identify the user that owns the resource.
    #[error("Unauthorized")]
    Unauthorized,

    /// The request body or path could not be parsed, or a required field was
    /// missing.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An empty string was used as a user's name.
    #[error("Name cannot be empty")]
    EmptyUserName,

    /// An empty string was used as a password.
    #[error("Password cannot be empty")]
    EmptyPassword,

    /// The email address could not be parsed.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// An empty string was used as a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category budget must be a finite, non-negative amount.
    #[error("{0} is not a valid budget, budgets must be zero or more")]
    InvalidBudget(f64),

    /// An empty string was used as an expense description.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// An expense amount must be a finite, non-negative amount.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    InvalidAmount(f64),

    /// The date string was neither a calendar date nor an RFC 3339 date-time.
    #[error("\"{0}\" is not a valid date, expected a date like 2024-01-31")]
    InvalidDate(String),

    /// An update request did not contain any fields to change.
    #[error("The update did not contain any fields to change")]
    EmptyUpdate,

    /// The email used to register is already in use.
    #[error("Email is already in use")]
    DuplicateEmail,

    /// The email and password combination did not match a registered user.
    ///
    /// Unknown emails and wrong passwords produce the same error so that
    /// clients cannot discover which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The user ID does not refer to a registered user.
    #[error("the user ID does not refer to a valid user")]
    InvalidUser,

    /// The category ID used to create an expense does not refer to a category
    /// owned by the same user.
    #[error("the category ID does not refer to one of the user's categories")]
    InvalidCategory,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user ID does not refer to a registered user.
    #[error("User not found")]
    UserNotFound,

    /// Tried to update a category that does not exist.
    #[error("Category not found")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist.
    #[error("Category not found")]
    DeleteMissingCategory,

    /// Tried to update an expense that does not exist or is owned by another user.
    #[error("Expense not found")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("Expense not found")]
    DeleteMissingExpense,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`, mirrors the `success` flag of successful responses.
    pub success: bool,
    /// A message that is safe to show to the client.
    pub message: String,
}

impl ErrorResponse {
    /// Create an error body with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl Error {
    /// The HTTP status code that the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::InvalidRequest(_)
            | Error::EmptyUserName
            | Error::EmptyPassword
            | Error::InvalidEmail(_)
            | Error::EmptyCategoryName
            | Error::InvalidBudget(_)
            | Error::EmptyDescription
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::EmptyUpdate
            | Error::InvalidCredentials
            | Error::InvalidUser
            | Error::InvalidCategory => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UserNotFound
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::InvalidTimezone(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::NotFound => "Not found".to_owned(),
            // Server side errors are not intended to be shown to the client.
            error if status.is_server_error() => {
                tracing::error!("An unexpected error occurred: {}", error);
                "Internal server error".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    use super::ErrorResponse;

    async fn parse_body(error: Error) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_is_401() {
        let (status, body) = parse_body(Error::Unauthorized).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, ErrorResponse::new("Unauthorized"));
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let (status, body) = parse_body(Error::DuplicateEmail).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.message, "Email is already in use");
    }

    #[tokio::test]
    async fn sql_error_does_not_leak_details() {
        let (status, body) = parse_body(Error::SqlError(rusqlite::Error::InvalidQuery)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, ErrorResponse::new("Internal server error"));
    }

    #[tokio::test]
    async fn missing_user_has_its_own_message() {
        let (status, body) = parse_body(Error::UserNotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, ErrorResponse::new("User not found"));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
