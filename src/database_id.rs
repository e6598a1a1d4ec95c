//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
/// The ID of a [Category](crate::category::Category).
pub type CategoryId = DatabaseID;
/// The ID of an [Expense](crate::expense::Expense).
pub type ExpenseId = DatabaseID;
