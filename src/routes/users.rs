//! Route handlers for registering users, checking their credentials and looking them up.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    stores::{CategoryStore, ExpenseStore, UserStore},
    user::{NewUser, Role, UserID, UserName, parse_email},
};

use super::required;

/// The request body for registering a user.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterData {
    /// The user's display name.
    pub name: Option<String>,
    /// The email to log in with.
    pub email: Option<String>,
    /// The password to log in with.
    pub password: Option<String>,
}

/// The request body for logging in.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogInData {
    /// The email the user registered with.
    pub email: Option<String>,
    /// The user's password.
    pub password: Option<String>,
}

/// A route handler for registering a new user.
///
/// Every field is validated before the store is touched. Responds with 409 if the email is
/// already registered.
pub async fn register_user<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Json(user_data), _): WithRejection<Json<RegisterData>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let name = UserName::new(&required(user_data.name, "name")?)?;
    let email = parse_email(&required(user_data.email, "email")?)?;
    let password = ValidatedPassword::new(&required(user_data.password, "password")?)?;

    match state.user_store.get_by_email(&email) {
        Ok(_) => return Err(Error::DuplicateEmail),
        Err(Error::NotFound) => {}
        Err(error) => return Err(error),
    }

    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)
        .inspect_err(|error| tracing::error!("could not hash password: {error}"))?;

    let user = state.user_store.create(NewUser {
        name,
        email,
        password_hash,
        role: Role::User,
    })?;

    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User successfully registered",
            "user": user,
        })),
    )
        .into_response())
}

/// A route handler for checking a user's email and password.
///
/// Unknown emails and wrong passwords get the same response.
pub async fn log_in<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Json(credentials), _): WithRejection<Json<LogInData>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let raw_email = required(credentials.email, "email")?;
    let password = required(credentials.password, "password")?;

    let email = parse_email(&raw_email).map_err(|_| Error::InvalidCredentials)?;

    let user = match state.user_store.get_by_email(&email) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    match user.password_hash.verify(&password) {
        Ok(true) => Ok(Json(user).into_response()),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// A route handler for getting a user by their ID.
pub async fn get_user<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserID>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    match state.user_store.get(user_id) {
        Ok(user) => Ok(Json(user).into_response()),
        Err(Error::NotFound) => Err(Error::UserNotFound),
        Err(error) => Err(error),
    }
}
