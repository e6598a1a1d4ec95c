//! Defines the expense store trait.

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{Expense, ExpenseUpdate, NewExpense},
    user::UserID,
};

/// Creates, retrieves, updates and deletes expenses.
pub trait ExpenseStore {
    /// Create a new expense in the store.
    ///
    /// Returns [Error::InvalidCategory] if the category does not exist or is owned by another user.
    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error>;

    /// Retrieve an expense from the store.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Retrieve a user's expenses, most recent first.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Expense>, Error>;

    /// Change the fields of an expense that are set in `update`.
    ///
    /// Returns [Error::UpdateMissingExpense] if the expense does not exist or is not owned by `user_id`.
    fn update(
        &self,
        id: ExpenseId,
        user_id: UserID,
        update: ExpenseUpdate,
    ) -> Result<ExpenseId, Error>;

    /// Delete an expense.
    ///
    /// Returns [Error::DeleteMissingExpense] if the expense does not exist.
    fn delete(&self, id: ExpenseId) -> Result<ExpenseId, Error>;
}
