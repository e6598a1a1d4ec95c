//! Route handlers for logging, listing, editing and deleting expenses.

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
    AppState, Error,
    database_id::ExpenseId,
    expense::{Description, ExpenseAmount, ExpenseUpdate, NewExpense, parse_date},
    stores::{CategoryStore, ExpenseStore, UserStore},
    timezone::local_today,
    user::UserID,
};

use super::{owner_id, required};

/// The request body for creating an expense.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseData {
    /// The ID of the user that will own the expense.
    pub user_id: Option<i64>,
    /// What the money was spent on.
    pub description: Option<String>,
    /// How much was spent.
    pub amount: Option<f64>,
    /// The category to log the expense against.
    pub category_id: Option<i64>,
    /// The day the money was spent, defaults to today.
    pub date: Option<String>,
}

/// The request body for updating an expense, absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdateData {
    /// The ID of the user that owns the expense.
    pub user_id: Option<i64>,
    /// The new description.
    pub description: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<String>,
}

/// A route handler for logging a new expense.
///
/// The date defaults to today in the server's timezone.
pub async fn create_expense<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Json(expense_data), _): WithRejection<Json<ExpenseData>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user_id = owner_id(expense_data.user_id)?;
    let description = Description::new(&required(expense_data.description, "description")?)?;
    let amount = ExpenseAmount::new(required(expense_data.amount, "amount")?)?;
    let category_id = required(expense_data.category_id, "categoryId")?;
    let date = match expense_data.date {
        Some(raw_date) => parse_date(&raw_date)?,
        None => local_today(&state.local_timezone)?,
    };

    let expense = state.expense_store.create(NewExpense {
        description,
        amount,
        date,
        category_id,
        user_id,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "expense": expense })),
    )
        .into_response())
}

/// A route handler for listing a user's expenses, most recent first.
pub async fn get_user_expenses<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserID>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .expense_store
        .get_by_user(user_id)
        .map(|expenses| Json(expenses).into_response())
}

/// A route handler for editing an expense.
///
/// Responds with 404 if the expense does not exist or is owned by another user.
pub async fn update_expense<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(expense_id), _): WithRejection<Path<ExpenseId>, Error>,
    WithRejection(Json(update_data), _): WithRejection<Json<ExpenseUpdateData>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user_id = owner_id(update_data.user_id)?;

    let update = ExpenseUpdate {
        description: update_data
            .description
            .as_deref()
            .map(Description::new)
            .transpose()?,
        amount: update_data.amount.map(ExpenseAmount::new).transpose()?,
        date: update_data.date.as_deref().map(parse_date).transpose()?,
    };

    if update.is_empty() {
        return Err(Error::EmptyUpdate);
    }

    state
        .expense_store
        .update(expense_id, user_id, update)
        .map(|id| Json(json!({ "success": true, "expenseId": id })).into_response())
}

/// A route handler for deleting an expense.
pub async fn delete_expense<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(expense_id), _): WithRejection<Path<ExpenseId>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .expense_store
        .delete(expense_id)
        .map(|id| Json(json!({ "success": true, "expenseId": id })).into_response())
}
