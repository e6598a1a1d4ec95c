//! Route handlers for categories and their monthly statistics.

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
    category::{Budget, CategoryName, CategoryUpdate, NewCategory},
    database_id::CategoryId,
    stores::{CategoryStore, ExpenseStore, UserStore},
    user::UserID,
};

use super::{owner_id, required};

/// The request body for creating a category.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    /// The ID of the user that will own the category.
    pub user_id: Option<i64>,
    /// The name of the category.
    pub name: Option<String>,
    /// The monthly budget for the category.
    pub budget: Option<f64>,
}

/// The request body for updating a category, absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryUpdateData {
    /// The new name.
    pub name: Option<String>,
    /// The new monthly budget.
    pub budget: Option<f64>,
}

/// A route handler for creating a new category.
///
/// A request without a user ID is rejected before anything else is checked.
pub async fn create_category<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Json(category_data), _): WithRejection<Json<CategoryData>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user_id = owner_id(category_data.user_id)?;
    let name = CategoryName::new(&required(category_data.name, "name")?)?;
    let budget = Budget::new(required(category_data.budget, "budget")?)?;

    state
        .category_store
        .create(NewCategory {
            name,
            budget,
            user_id,
        })
        .map(|category| (StatusCode::CREATED, Json(category)).into_response())
}

/// A route handler for listing a user's categories with their expenses.
pub async fn get_user_categories<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserID>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .category_store
        .get_by_user_with_expenses(user_id)
        .map(|categories| Json(categories).into_response())
}

/// A route handler for changing the name or budget of a category.
pub async fn update_category<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(category_id), _): WithRejection<Path<CategoryId>, Error>,
    WithRejection(Json(update_data), _): WithRejection<Json<CategoryUpdateData>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let update = CategoryUpdate {
        name: update_data
            .name
            .as_deref()
            .map(CategoryName::new)
            .transpose()?,
        budget: update_data.budget.map(Budget::new).transpose()?,
    };

    if update.is_empty() {
        return Err(Error::EmptyUpdate);
    }

    state
        .category_store
        .update(category_id, update)
        .map(|id| Json(json!({ "id": id })).into_response())
}

/// A route handler for deleting a category along with its expenses.
pub async fn delete_category<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(category_id), _): WithRejection<Path<CategoryId>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .category_store
        .delete(category_id)
        .inspect(|id| tracing::info!("Deleted category {id}"))
        .map(|id| Json(json!({ "id": id })).into_response())
}

/// A route handler for a user's spending per category and month.
pub async fn get_category_statistics<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserID>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .category_store
        .monthly_statistics(user_id)
        .map(|statistics| Json(statistics).into_response())
}
