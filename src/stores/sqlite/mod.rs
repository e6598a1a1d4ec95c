//! Contains the SQLite backed stores and a convenience type alias and function for an [AppState]
//! that uses them.

mod category;
mod expense;
mod user;

pub use category::SQLiteCategoryStore;
pub use expense::SQLiteExpenseStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteCategoryStore, SQLiteExpenseStore, SQLiteUserStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// `local_timezone` should be a canonical timezone name, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns an error if the database could not be initialized.
pub fn create_app_state(
    db_connection: Connection,
    local_timezone: &str,
) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        local_timezone,
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteExpenseStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
    ))
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}
