//! Pocket Budget is a backend for tracking personal spending against monthly budgets.
//!
//! Users register and log in, organise their spending into categories that each have a monthly
//! budget, and log expenses against those categories. The library provides a JSON REST API plus a
//! server-rendered dashboard page that summarises spending per category and month.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod expense;
mod html;
mod logging;
mod password;
mod routes;
mod routing;
mod statistics;
pub mod stores;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{Budget, Category, CategoryName, NewCategory};
pub use db::initialize as initialize_db;
pub use error::{Error, ErrorResponse};
pub use expense::{Description, Expense, ExpenseAmount, NewExpense};
pub use logging::logging_middleware;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{NewUser, Role, User, UserID, UserName};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
