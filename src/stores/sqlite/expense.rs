//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::ExpenseId,
    db::{CreateTable, MapRow},
    expense::{Description, Expense, ExpenseAmount, ExpenseUpdate, NewExpense},
    stores::ExpenseStore,
    user::UserID,
};

use super::lock;

/// Stores expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create a new expense in the database.
    ///
    /// # Errors
    /// This function will return an [Error::InvalidCategory] if the category does not exist or
    /// is owned by another user, or an [Error::SqlError] if there is some other SQL error.
    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error> {
        let connection = lock(&self.connection)?;

        let category_owner: Option<i64> = connection
            .query_row(
                "SELECT user_id FROM category WHERE id = ?1",
                (new_expense.category_id,),
                |row| row.get(0),
            )
            .optional()?;

        if category_owner != Some(new_expense.user_id.as_i64()) {
            return Err(Error::InvalidCategory);
        }

        connection.execute(
            "INSERT INTO expense (description, amount, date, category_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                new_expense.description.as_ref(),
                new_expense.amount.as_f64(),
                new_expense.date,
                new_expense.category_id,
                new_expense.user_id.as_i64(),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Expense {
            id,
            description: new_expense.description,
            amount: new_expense.amount,
            date: new_expense.date,
            category_id: new_expense.category_id,
            user_id: new_expense.user_id,
        })
    }

    /// Retrieve an expense in the database by its `id`.
    ///
    /// # Errors
    /// This function will return an [Error::NotFound] if `id` does not refer to an expense.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT id, description, amount, date, category_id, user_id
                 FROM expense WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], SQLiteExpenseStore::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Expense>, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT id, description, amount, date, category_id, user_id
                 FROM expense WHERE user_id = :user_id
                 ORDER BY date DESC, id DESC",
            )?
            .query_map(
                &[(":user_id", &user_id.as_i64())],
                SQLiteExpenseStore::map_row,
            )?
            .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
            .collect()
    }

    /// Update an expense owned by `user_id`.
    ///
    /// # Errors
    /// This function will return an [Error::UpdateMissingExpense] if the expense does not exist
    /// or belongs to another user.
    fn update(
        &self,
        id: ExpenseId,
        user_id: UserID,
        update: ExpenseUpdate,
    ) -> Result<ExpenseId, Error> {
        let rows_affected = lock(&self.connection)?.execute(
            "UPDATE expense
             SET description = COALESCE(?1, description),
                 amount = COALESCE(?2, amount),
                 date = COALESCE(?3, date)
             WHERE id = ?4 AND user_id = ?5",
            (
                update
                    .description
                    .as_ref()
                    .map(|description| description.as_ref()),
                update.amount.map(|amount| amount.as_f64()),
                update.date,
                id,
                user_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingExpense);
        }

        Ok(id)
    }

    fn delete(&self, id: ExpenseId) -> Result<ExpenseId, Error> {
        let connection = lock(&self.connection)?;
        let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingExpense);
        }

        Ok(id)
    }
}

impl CreateTable for SQLiteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        // Expenses are listed and aggregated per user and category.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
            (),
        )?;
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_expense_category ON expense(category_id);",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_description: String = row.get(offset + 1)?;

        Ok(Expense {
            id: row.get(offset)?,
            description: Description::new_unchecked(&raw_description),
            amount: ExpenseAmount::new_unchecked(row.get(offset + 2)?),
            date: row.get(offset + 3)?,
            category_id: row.get(offset + 4)?,
            user_id: UserID::new(row.get(offset + 5)?),
        })
    }
}
