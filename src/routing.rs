//! Application router configuration with the JSON API, the dashboard page and the fallback.

use axum::{
    Json, Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, Error,
    dashboard::get_dashboard_page,
    endpoints,
    logging::logging_middleware,
    routes::{
        categories::{
            create_category, delete_category, get_category_statistics, get_user_categories,
            update_category,
        },
        expenses::{create_expense, delete_expense, get_user_expenses, update_expense},
        users::{get_user, log_in, register_user},
    },
    stores::{CategoryStore, ExpenseStore, UserStore},
};

/// Return a router with all the app's routes.
pub fn build_router<C, E, U>(state: AppState<C, E, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    E: ExpenseStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let user_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user::<C, E, U>))
        .route(endpoints::LOG_IN, post(log_in::<C, E, U>))
        .route(endpoints::USER, get(get_user::<C, E, U>));

    let category_routes = Router::new()
        .route(endpoints::CATEGORIES, post(create_category::<C, E, U>))
        .route(
            endpoints::USER_CATEGORIES,
            get(get_user_categories::<C, E, U>),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category::<C, E, U>).delete(delete_category::<C, E, U>),
        )
        .route(
            endpoints::CATEGORY_STATISTICS,
            get(get_category_statistics::<C, E, U>),
        );

    let expense_routes = Router::new()
        .route(endpoints::EXPENSES, post(create_expense::<C, E, U>))
        .route(endpoints::USER_EXPENSES, get(get_user_expenses::<C, E, U>))
        .route(
            endpoints::EXPENSE,
            put(update_expense::<C, E, U>).delete(delete_expense::<C, E, U>),
        );

    Router::new()
        .route(endpoints::STATUS, get(get_status))
        .route(
            endpoints::DASHBOARD_VIEW,
            get(get_dashboard_page::<C, E, U>),
        )
        .merge(user_routes)
        .merge(category_routes)
        .merge(expense_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Lets clients check that the server is up.
async fn get_status() -> Json<Value> {
    Json(json!({ "message": "Back-end is running..." }))
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
