//! This file defines the `Expense` type and the types needed to create and update an expense.

use std::fmt::Display;

use serde::Serialize;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{
    Error,
    database_id::{CategoryId, ExpenseId},
    user::UserID,
};

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// Parse a date sent by a client.
///
/// Accepts either a calendar date such as "2024-01-31" or an RFC 3339
/// date-time such as "2024-01-31T12:00:00.000Z", in which case the date in
/// the date-time's own offset is used.
///
/// # Errors
///
/// Returns an [Error::InvalidDate] if `raw_date` is neither.
pub fn parse_date(raw_date: &str) -> Result<Date, Error> {
    let raw_date = raw_date.trim();

    if let Ok(date) = Date::parse(raw_date, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }

    OffsetDateTime::parse(raw_date, &Rfc3339)
        .map(|date_time| date_time.date())
        .map_err(|_| Error::InvalidDate(raw_date.to_owned()))
}

/// The description of an expense, e.g. "Weekly groceries".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
pub struct Description(String);

impl Description {
    /// Create a description.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyDescription] if `description` is empty or only whitespace.
    pub fn new(description: &str) -> Result<Self, Error> {
        let description = description.trim();

        if description.is_empty() {
            Err(Error::EmptyDescription)
        } else {
            Ok(Self(description.to_string()))
        }
    }

    /// Create a description without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(description: &str) -> Self {
        Self(description.to_string())
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The amount of money spent on an expense.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ExpenseAmount(f64);

impl ExpenseAmount {
    /// Create an expense amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `amount` is negative, infinite or NaN.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::InvalidAmount(amount))
        }
    }

    /// Create an expense amount without validation.
    ///
    /// The caller should ensure that `amount` is finite and not negative.
    pub fn new_unchecked(amount: f64) -> Self {
        Self(amount)
    }

    /// The amount as a plain number.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// Money spent on a given day, attributed to a category and a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: Description,
    /// How much was spent.
    pub amount: ExpenseAmount,
    /// The day the money was spent.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The category the expense counts against.
    pub category_id: CategoryId,
    /// The ID of the user that owns the expense.
    pub user_id: UserID,
}

/// The validated data needed to create an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// What the money was spent on.
    pub description: Description,
    /// How much was spent.
    pub amount: ExpenseAmount,
    /// The day the money was spent.
    pub date: Date,
    /// The category the expense counts against, must be owned by `user_id`.
    pub category_id: CategoryId,
    /// The ID of the user that owns the expense.
    pub user_id: UserID,
}

/// A partial update to an expense, `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    /// The new description.
    pub description: Option<Description>,
    /// The new amount.
    pub amount: Option<ExpenseAmount>,
    /// The new date.
    pub date: Option<Date>,
}

impl ExpenseUpdate {
    /// Whether the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.date.is_none()
    }
}


#[cfg(test)]
mod description_tests {
    use crate::{Error, expense::Description};

    #[test]
    fn new_fails_on_blank() {
        assert_eq!(Description::new(" "), Err(Error::EmptyDescription));
    }

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(Description::new(" Lunch\n").unwrap().as_ref(), "Lunch");
    }
}
