//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/users/{user_id}', use [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/users/register";
/// The route for checking a user's email and password.
pub const LOG_IN: &str = "/users/login";
/// The route to get a single user.
pub const USER: &str = "/users/{user_id}";
/// The route to create a category.
pub const CATEGORIES: &str = "/categories";
/// The route to list a user's categories along with their expenses.
pub const USER_CATEGORIES: &str = "/categories/user/{user_id}";
/// The route to update or delete a category.
pub const CATEGORY: &str = "/categories/{category_id}";
/// The route to get a user's spending per category and month.
pub const CATEGORY_STATISTICS: &str = "/categories/statistics/{user_id}";
/// The route to create an expense.
pub const EXPENSES: &str = "/expenses";
/// The route to list a user's expenses.
pub const USER_EXPENSES: &str = "/expenses/user/{user_id}";
/// The route to update or delete an expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route for checking that the server is up.
pub const STATUS: &str = "/status";
/// The page showing a user's budget status and monthly statistics.
pub const DASHBOARD_VIEW: &str = "/dashboard/{user_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
