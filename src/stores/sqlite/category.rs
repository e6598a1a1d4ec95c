//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Budget, Category, CategoryName, CategoryUpdate, CategoryWithExpenses, NewCategory},
    database_id::CategoryId,
    db::{CreateTable, MapRow},
    statistics::MonthlyCategoryStatistics,
    stores::CategoryStore,
    user::UserID,
};

use super::{SQLiteExpenseStore, lock};

/// Creates, retrieves, updates and deletes expense categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// This function will return an [Error::InvalidUser] if the owner does not exist, or an
    /// [Error::SqlError] if there is some other SQL error.
    fn create(&self, new_category: NewCategory) -> Result<Category, Error> {
        let connection = lock(&self.connection)?;

        connection
            .execute(
                "INSERT INTO category (name, budget, user_id) VALUES (?1, ?2, ?3);",
                (
                    new_category.name.as_ref(),
                    new_category.budget.as_f64(),
                    new_category.user_id.as_i64(),
                ),
            )
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                    Error::InvalidUser
                }
                error => error.into(),
            })?;

        let id = connection.last_insert_rowid();

        Ok(Category {
            id,
            name: new_category.name,
            budget: new_category.budget,
            user_id: new_category.user_id,
        })
    }

    /// Retrieve the category with `category_id`.
    ///
    /// # Errors
    /// This function will return an [Error::NotFound] if the category does not exist.
    fn get(&self, category_id: CategoryId) -> Result<Category, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, budget, user_id FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], SQLiteCategoryStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve a user's categories and their expenses with a single joined query.
    fn get_by_user_with_expenses(
        &self,
        user_id: UserID,
    ) -> Result<Vec<CategoryWithExpenses>, Error> {
        let connection = lock(&self.connection)?;
        let mut statement = connection.prepare(
            "SELECT c.id, c.name, c.budget, c.user_id,
                    e.id, e.description, e.amount, e.date, e.category_id, e.user_id
             FROM category c
             LEFT JOIN expense e ON e.category_id = c.id
             WHERE c.user_id = :user_id
             ORDER BY c.id ASC, e.date DESC, e.id DESC;",
        )?;

        let rows = statement.query_map(&[(":user_id", &user_id.as_i64())], |row| {
            let category = SQLiteCategoryStore::map_row(row)?;
            let expense_id: Option<i64> = row.get(4)?;
            let expense = match expense_id {
                Some(_) => Some(SQLiteExpenseStore::map_row_with_offset(row, 4)?),
                None => None,
            };

            Ok((category, expense))
        })?;

        let mut categories: Vec<CategoryWithExpenses> = Vec::new();

        for row in rows {
            let (category, expense) = row?;

            match categories.last_mut() {
                Some(last) if last.category.id == category.id => {
                    last.expenses.extend(expense);
                }
                _ => categories.push(CategoryWithExpenses {
                    category,
                    expenses: expense.into_iter().collect(),
                }),
            }
        }

        Ok(categories)
    }

    fn update(&self, category_id: CategoryId, update: CategoryUpdate) -> Result<CategoryId, Error> {
        let rows_affected = lock(&self.connection)?.execute(
            "UPDATE category
             SET name = COALESCE(?1, name), budget = COALESCE(?2, budget)
             WHERE id = ?3;",
            (
                update.name.as_ref().map(|name| name.as_ref()),
                update.budget.map(|budget| budget.as_f64()),
                category_id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingCategory);
        }

        Ok(category_id)
    }

    /// Delete a category, the foreign key cascade removes its expenses.
    fn delete(&self, category_id: CategoryId) -> Result<CategoryId, Error> {
        let rows_affected = lock(&self.connection)?
            .execute("DELETE FROM category WHERE id = ?1;", (category_id,))?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingCategory);
        }

        Ok(category_id)
    }

    fn monthly_statistics(&self, user_id: UserID) -> Result<Vec<MonthlyCategoryStatistics>, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT c.name,
                        date(e.date, 'start of month') AS month,
                        COALESCE(SUM(e.amount), 0) AS total_amount,
                        c.budget
                 FROM category c
                 LEFT JOIN expense e ON e.category_id = c.id
                 WHERE c.user_id = :user_id
                 GROUP BY c.id, c.name, c.budget, month
                 ORDER BY month DESC NULLS FIRST, c.name ASC;",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], |row| {
                let category_name = row.get(0)?;
                let month = row.get(1)?;
                let total_amount: f64 = row.get(2)?;
                let budget: f64 = row.get(3)?;

                Ok(MonthlyCategoryStatistics {
                    category_name,
                    month,
                    total_amount,
                    budget,
                    remaining: budget - total_amount,
                })
            })?
            .map(|maybe_row| maybe_row.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                budget REAL NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_name: String = row.get(offset + 1)?;
        let name = CategoryName::new_unchecked(&raw_name);

        let budget = Budget::new_unchecked(row.get(offset + 2)?);
        let user_id = UserID::new(row.get(offset + 3)?);

        Ok(Self::ReturnType {
            id,
            name,
            budget,
            user_id,
        })
    }
}

#[cfg(test)]
mod category_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{Budget, CategoryName, CategoryUpdate, NewCategory},
        db::initialize,
        expense::{Description, ExpenseAmount, NewExpense},
        statistics::MonthlyCategoryStatistics,
        stores::{CategoryStore, ExpenseStore, sqlite::SQLiteExpenseStore},
        user::UserID,
    };

    use super::SQLiteCategoryStore;

    fn get_test_stores() -> (SQLiteCategoryStore, SQLiteExpenseStore, Arc<Mutex<Connection>>) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute(
                "INSERT INTO user (id, name, email, password) VALUES
                    (1, 'Ada', 'ada@example.com', 'hash'),
                    (2, 'Bob', 'bob@example.com', 'hash');",
                (),
            )
            .unwrap();
        let connection = Arc::new(Mutex::new(connection));

        (
            SQLiteCategoryStore::new(connection.clone()),
            SQLiteExpenseStore::new(connection.clone()),
            connection,
        )
    }

    fn new_category(name: &str, budget: f64, user_id: i64) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(name),
            budget: Budget::new_unchecked(budget),
            user_id: UserID::new(user_id),
        }
    }

    fn new_expense(amount: f64, date: time::Date, category_id: i64) -> NewExpense {
        NewExpense {
            description: Description::new_unchecked("Something"),
            amount: ExpenseAmount::new_unchecked(amount),
            date,
            category_id,
            user_id: UserID::new(1),
        }
    }

    #[test]
    fn create_category_succeeds() {
        let (store, _, _) = get_test_stores();
        let want = new_category("Food", 200.0, 1);

        let category = store.create(want.clone()).unwrap();

        assert!(category.id > 0);
        assert_eq!(category.name, want.name);
        assert_eq!(category.budget, want.budget);
        assert_eq!(category.user_id, want.user_id);
    }

    #[test]
    fn create_category_fails_on_missing_user() {
        let (store, _, _) = get_test_stores();

        let result = store.create(new_category("Food", 200.0, 42));

        assert_eq!(result, Err(Error::InvalidUser));
    }

    #[test]
    fn get_category_succeeds() {
        let (store, _, _) = get_test_stores();
        let inserted_category = store.create(new_category("Food", 200.0, 1)).unwrap();

        let selected_category = store.get(inserted_category.id);

        assert_eq!(Ok(inserted_category), selected_category);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let (store, _, _) = get_test_stores();
        let inserted_category = store.create(new_category("Food", 200.0, 1)).unwrap();

        let selected_category = store.get(inserted_category.id + 123);

        assert_eq!(selected_category, Err(Error::NotFound));
    }

    #[test]
    fn get_by_user_embeds_expenses() {
        let (store, expense_store, _) = get_test_stores();
        let food = store.create(new_category("Food", 200.0, 1)).unwrap();
        let rent = store.create(new_category("Rent", 1000.0, 1)).unwrap();
        store.create(new_category("Other", 50.0, 2)).unwrap();
        let older = expense_store
            .create(new_expense(10.0, date!(2024 - 01 - 05), food.id))
            .unwrap();
        let newer = expense_store
            .create(new_expense(20.0, date!(2024 - 02 - 05), food.id))
            .unwrap();

        let categories = store.get_by_user_with_expenses(UserID::new(1)).unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, food);
        assert_eq!(categories[0].expenses, vec![newer, older]);
        assert_eq!(categories[1].category, rent);
        assert!(categories[1].expenses.is_empty());
    }

    #[test]
    fn get_by_user_returns_empty_list_for_user_without_categories() {
        let (store, _, _) = get_test_stores();

        assert_eq!(store.get_by_user_with_expenses(UserID::new(2)), Ok(vec![]));
    }

    #[test]
    fn update_changes_only_given_fields() {
        let (store, _, _) = get_test_stores();
        let category = store.create(new_category("Food", 200.0, 1)).unwrap();

        let updated_id = store
            .update(
                category.id,
                CategoryUpdate {
                    name: None,
                    budget: Some(Budget::new_unchecked(250.0)),
                },
            )
            .unwrap();

        let updated = store.get(updated_id).unwrap();
        assert_eq!(updated.name, category.name);
        assert_eq!(updated.budget, Budget::new_unchecked(250.0));
    }

    #[test]
    fn update_missing_category_fails() {
        let (store, _, _) = get_test_stores();

        let result = store.update(
            999,
            CategoryUpdate {
                name: Some(CategoryName::new_unchecked("Food")),
                budget: None,
            },
        );

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_cascades_to_expenses() {
        let (store, expense_store, connection) = get_test_stores();
        let category = store.create(new_category("Food", 200.0, 1)).unwrap();
        let expense = expense_store
            .create(new_expense(10.0, date!(2024 - 01 - 05), category.id))
            .unwrap();

        assert_eq!(store.delete(category.id), Ok(category.id));

        assert_eq!(store.get(category.id), Err(Error::NotFound));
        assert_eq!(expense_store.get(expense.id), Err(Error::NotFound));
        let orphans: i64 = connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM expense WHERE category_id NOT IN (SELECT id FROM category)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn delete_missing_category_fails() {
        let (store, _, _) = get_test_stores();

        assert_eq!(store.delete(999), Err(Error::DeleteMissingCategory));
    }

    #[test]
    fn monthly_statistics_are_grouped_and_ordered() {
        let (store, expense_store, _) = get_test_stores();
        let food = store.create(new_category("Food", 200.0, 1)).unwrap();
        let bills = store.create(new_category("Bills", 300.0, 1)).unwrap();
        store.create(new_category("Savings", 500.0, 1)).unwrap();
        store.create(new_category("Not mine", 10.0, 2)).unwrap();

        for (amount, date, category_id) in [
            (100.0, date!(2024 - 03 - 02), food.id),
            (50.0, date!(2024 - 03 - 30), food.id),
            (20.0, date!(2024 - 02 - 14), food.id),
            (250.0, date!(2024 - 03 - 01), bills.id),
        ] {
            expense_store
                .create(new_expense(amount, date, category_id))
                .unwrap();
        }

        let statistics = store.monthly_statistics(UserID::new(1)).unwrap();

        assert_eq!(
            statistics,
            vec![
                MonthlyCategoryStatistics {
                    category_name: "Savings".to_owned(),
                    month: None,
                    total_amount: 0.0,
                    budget: 500.0,
                    remaining: 500.0,
                },
                MonthlyCategoryStatistics {
                    category_name: "Bills".to_owned(),
                    month: Some(date!(2024 - 03 - 01)),
                    total_amount: 250.0,
                    budget: 300.0,
                    remaining: 50.0,
                },
                MonthlyCategoryStatistics {
                    category_name: "Food".to_owned(),
                    month: Some(date!(2024 - 03 - 01)),
                    total_amount: 150.0,
                    budget: 200.0,
                    remaining: 50.0,
                },
                MonthlyCategoryStatistics {
                    category_name: "Food".to_owned(),
                    month: Some(date!(2024 - 02 - 01)),
                    total_amount: 20.0,
                    budget: 200.0,
                    remaining: 180.0,
                },
            ]
        );
    }

    #[test]
    fn categories_without_expenses_come_before_dated_rows() {
        let (store, expense_store, _) = get_test_stores();
        let alpha = store.create(new_category("Alpha", 100.0, 1)).unwrap();
        store.create(new_category("Zeta", 100.0, 1)).unwrap();
        expense_store
            .create(new_expense(10.0, date!(2024 - 03 - 02), alpha.id))
            .unwrap();

        let statistics = store.monthly_statistics(UserID::new(1)).unwrap();

        let got: Vec<_> = statistics
            .iter()
            .map(|row| (row.category_name.as_str(), row.month))
            .collect();
        assert_eq!(
            got,
            vec![("Zeta", None), ("Alpha", Some(date!(2024 - 03 - 01)))]
        );
    }

    #[test]
    fn monthly_statistics_report_overspending_as_negative_remaining() {
        let (store, expense_store, _) = get_test_stores();
        let food = store.create(new_category("Food", 100.0, 1)).unwrap();
        expense_store
            .create(new_expense(120.0, date!(2024 - 03 - 02), food.id))
            .unwrap();

        let statistics = store.monthly_statistics(UserID::new(1)).unwrap();

        assert_eq!(statistics[0].remaining, -20.0);
    }
}
