//! Defines the category store trait.

use crate::{
    Error,
    category::{Category, CategoryUpdate, CategoryWithExpenses, NewCategory},
    database_id::CategoryId,
    statistics::MonthlyCategoryStatistics,
    user::UserID,
};

/// Creates, retrieves, updates and deletes expense categories.
pub trait CategoryStore {
    /// Create a new category and add it the store.
    ///
    /// Returns [Error::InvalidUser] if the owner does not exist.
    fn create(&self, new_category: NewCategory) -> Result<Category, Error>;

    /// Get a category by its ID.
    fn get(&self, category_id: CategoryId) -> Result<Category, Error>;

    /// Get all categories for a given user along with their expenses, ordered by category ID.
    fn get_by_user_with_expenses(
        &self,
        user_id: UserID,
    ) -> Result<Vec<CategoryWithExpenses>, Error>;

    /// Change the fields of a category that are set in `update`.
    ///
    /// Returns [Error::UpdateMissingCategory] if the category does not exist.
    fn update(&self, category_id: CategoryId, update: CategoryUpdate) -> Result<CategoryId, Error>;

    /// Delete a category and all of its expenses.
    ///
    /// Returns [Error::DeleteMissingCategory] if the category does not exist.
    fn delete(&self, category_id: CategoryId) -> Result<CategoryId, Error>;

    /// The amount spent per category per month for a user.
    ///
    /// Rows are ordered by month, most recent first, then by category name.
    fn monthly_statistics(&self, user_id: UserID) -> Result<Vec<MonthlyCategoryStatistics>, Error>;
}
