//! Implements a struct that holds the state of the REST server.

use crate::stores::{CategoryStore, ExpenseStore, UserStore};

/// The state of the REST server.
///
/// The stores are generic so that route handlers can be tested without a database.
#[derive(Debug, Clone)]
pub struct AppState<C, E, U>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The store for managing user [categories](crate::category::Category).
    pub category_store: C,
    /// The store for managing user [expenses](crate::expense::Expense).
    pub expense_store: E,
    /// The store for managing [users](crate::user::User).
    pub user_store: U,
}

impl<C, E, U> AppState<C, E, U>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState].
    ///
    /// `local_timezone` should be a canonical timezone name, e.g. "Pacific/Auckland".
    pub fn new(local_timezone: &str, category_store: C, expense_store: E, user_store: U) -> Self {
        Self {
            local_timezone: local_timezone.to_owned(),
            category_store,
            expense_store,
            user_store,
        }
    }
}
