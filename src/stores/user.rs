//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    user::{NewUser, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Returns [Error::DuplicateEmail] if another user already registered with the same email.
    fn create(&self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;
}
