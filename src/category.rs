//! This file defines the `Category` type and the types needed to create and update a category.
//! A category is a budget bucket that expenses are logged against.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId, expense::Expense, user::UserID};

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The amount of money a user plans to spend in a category each month.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Budget(f64);

impl Budget {
    /// Create a budget.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidBudget] if `amount` is negative, infinite or NaN.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::InvalidBudget(amount))
        }
    }

    /// Create a budget without validation.
    ///
    /// The caller should ensure that `amount` is finite and not negative.
    pub fn new_unchecked(amount: f64) -> Self {
        Self(amount)
    }

    /// The budget as a plain number.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A category for expenses, e.g., 'Groceries', 'Rent', 'Eating Out'.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name of the category.
    pub name: CategoryName,
    /// The monthly budget for the category.
    pub budget: Budget,
    /// The ID of the user that owns the category.
    pub user_id: UserID,
}

/// The validated data needed to create a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The name of the category.
    pub name: CategoryName,
    /// The monthly budget for the category.
    pub budget: Budget,
    /// The ID of the user that owns the category.
    pub user_id: UserID,
}

/// A partial update to a category, `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    /// The new name of the category.
    pub name: Option<CategoryName>,
    /// The new monthly budget of the category.
    pub budget: Option<Budget>,
}

impl CategoryUpdate {
    /// Whether the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.budget.is_none()
    }
}

/// A category together with all of its expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithExpenses {
    /// The category.
    #[serde(flatten)]
    pub category: Category,
    /// The expenses logged against the category.
    pub expenses: Vec<Expense>,
}
