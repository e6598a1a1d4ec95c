//! The dashboard page, an overview of a user's spending per category and month.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use maud::{Markup, html};
use time::{Date, macros::format_description};

use crate::{
    AppState, Error, endpoints,
    html::{
        ALERT_ERROR_STYLE, ALERT_WARNING_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency,
    },
    statistics::{BudgetLevel, BudgetStatus, MonthlyCategoryStatistics},
    stores::{CategoryStore, ExpenseStore, UserStore},
    timezone::local_today,
    user::{User, UserID},
};

/// Display a page with the user's budget status for the current month and their spending per
/// category and month.
pub async fn get_dashboard_page<C, E, U>(
    State(state): State<AppState<C, E, U>>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserID>, Error>,
) -> Result<Response, Error>
where
    C: CategoryStore + Send + Sync,
    E: ExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = match state.user_store.get(user_id) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::UserNotFound),
        Err(error) => return Err(error),
    };

    let categories = state
        .category_store
        .get_by_user_with_expenses(user_id)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let statistics = state
        .category_store
        .monthly_statistics(user_id)
        .inspect_err(|error| tracing::error!("Failed to retrieve statistics: {error}"))?;

    let today = local_today(&state.local_timezone)?;
    let status = BudgetStatus::for_month(&categories, today);

    Ok(dashboard_view(&user, &status, &statistics).into_response())
}

fn format_month(month: Option<Date>) -> String {
    let format = format_description!("[month repr:long] [year]");

    month
        .and_then(|month| month.format(format).ok())
        .unwrap_or_else(|| "No expenses".to_owned())
}

fn budget_banner(status: &BudgetStatus) -> Markup {
    let style = match status.level {
        BudgetLevel::OnTrack => return html!(),
        BudgetLevel::NearLimit => ALERT_WARNING_STYLE,
        BudgetLevel::Exceeded => ALERT_ERROR_STYLE,
    };

    html!(
        @if let Some(message) = status.message() {
            div id="budget-alert" class=(style) role="alert"
            {
                (message)
            }
        }
    )
}

fn dashboard_view(
    user: &User,
    status: &BudgetStatus,
    statistics: &[MonthlyCategoryStatistics],
) -> Markup {
    let table_row = |row: &MonthlyCategoryStatistics| {
        let remaining_style = if row.remaining < 0.0 {
            format!("{TABLE_CELL_STYLE} negative")
        } else {
            TABLE_CELL_STYLE.to_owned()
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (row.category_name) }
                td class=(TABLE_CELL_STYLE) { (format_month(row.month)) }
                td class=(TABLE_CELL_STYLE) { (format_currency(row.total_amount)) }
                td class=(TABLE_CELL_STYLE) { (format_currency(row.budget)) }
                td class=(remaining_style) { (format_currency(row.remaining)) }
            }
        )
    };

    let content = html!(
        h1 { "Dashboard" }
        p { "Welcome back, " (user.name) "." }

        (budget_banner(status))

        section
        {
            h2 { "This month" }
            p id="month-summary"
            {
                "Spent " (format_currency(status.total_spent))
                " of " (format_currency(status.total_budget))
                " (" (status.percentage) "%)"
            }
        }

        section
        {
            h2 { "Spending by category" }
            a href=(endpoints::format_endpoint(endpoints::CATEGORY_STATISTICS, user.id.as_i64()))
            {
                "View as JSON"
            }

            table id="statistics"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Spent" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Budget" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Remaining" }
                    }
                }

                tbody
                {
                    @for row in statistics {
                        (table_row(row))
                    }

                    @if statistics.is_empty() {
                        tr
                        {
                            td colspan="5" class=(TABLE_CELL_STYLE)
                            {
                                "No categories created yet."
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &content)
}
