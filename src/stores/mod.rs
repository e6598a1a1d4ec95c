//! Contains traits and implementations for objects that store the domain models.

mod category;
mod expense;
mod user;

pub mod sqlite;

pub use category::CategoryStore;
pub use expense::ExpenseStore;
pub use user::UserStore;
