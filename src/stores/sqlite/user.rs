//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error, PasswordHash,
    db::{CreateTable, MapRow},
    stores::UserStore,
    user::{NewUser, User, UserID, UserName},
};

use super::lock;

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DuplicateEmail] if the email is already registered,
    /// or [Error::SqlError] if another SQL related error occurred.
    fn create(&self, new_user: NewUser) -> Result<User, Error> {
        let connection = lock(&self.connection)?;

        connection.execute(
            "INSERT INTO user (name, email, password, role) VALUES (?1, ?2, ?3, ?4)",
            (
                new_user.name.as_ref(),
                new_user.email.as_str(),
                new_user.password_hash.as_ref(),
                new_user.role,
            ),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User {
            id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
        })
    }

    /// Get the user from the database that has the specified `id`.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified ID or [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, email, password, role FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], SQLiteUserStore::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `email` address.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified email or [Error::SqlError] there are SQL related errors.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, email, password, role FROM user WHERE email = :email")?
            .query_row(&[(":email", email.as_str())], SQLiteUserStore::map_row)
            .map_err(|e| e.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'user'
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_name: String = row.get(offset + 1)?;
        let raw_email: String = row.get(offset + 2)?;
        let raw_password_hash: String = row.get(offset + 3)?;
        let role = row.get(offset + 4)?;

        Ok(User {
            id: UserID::new(raw_id),
            name: UserName::new_unchecked(&raw_name),
            email: EmailAddress::new_unchecked(raw_email),
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            role,
        })
    }
}
