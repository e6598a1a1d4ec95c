//! In-memory stores that record how route handlers call them.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;

use crate::{
    AppState, Error,
    category::{Category, CategoryUpdate, CategoryWithExpenses, NewCategory},
    database_id::{CategoryId, ExpenseId},
    expense::{Expense, ExpenseUpdate, NewExpense},
    statistics::MonthlyCategoryStatistics,
    stores::{CategoryStore, ExpenseStore, UserStore},
    user::{NewUser, User, UserID},
};

pub(crate) type SpyAppState = AppState<SpyCategoryStore, SpyExpenseStore, SpyUserStore>;

/// Create an app state whose stores share their recorded calls with the returned clones.
pub(crate) fn spy_state() -> SpyAppState {
    AppState::new(
        "Etc/UTC",
        SpyCategoryStore::default(),
        SpyExpenseStore::default(),
        SpyUserStore::default(),
    )
}

// Use Arc Mutex so that clones of the store share state and can be passed into async route
// handlers.
#[derive(Clone, Default)]
pub(crate) struct SpyUserStore {
    pub users: Arc<Mutex<Vec<User>>>,
    pub create_calls: Arc<Mutex<Vec<NewUser>>>,
}

impl UserStore for SpyUserStore {
    fn create(&self, new_user: NewUser) -> Result<User, Error> {
        self.create_calls.lock().unwrap().push(new_user.clone());

        let mut users = self.users.lock().unwrap();

        if users.iter().any(|user| user.email == new_user.email) {
            return Err(Error::DuplicateEmail);
        }

        let user = User {
            id: UserID::new(users.len() as i64 + 1),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
        };
        users.push(user.clone());

        Ok(user)
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| &user.email == email)
            .cloned()
            .ok_or(Error::NotFound)
    }
}

#[derive(Clone, Default)]
pub(crate) struct SpyCategoryStore {
    pub categories: Arc<Mutex<Vec<Category>>>,
    pub create_calls: Arc<Mutex<Vec<NewCategory>>>,
    pub update_calls: Arc<Mutex<Vec<(CategoryId, CategoryUpdate)>>>,
    pub delete_calls: Arc<Mutex<Vec<CategoryId>>>,
}

impl CategoryStore for SpyCategoryStore {
    fn create(&self, new_category: NewCategory) -> Result<Category, Error> {
        self.create_calls.lock().unwrap().push(new_category.clone());

        let mut categories = self.categories.lock().unwrap();
        let category = Category {
            id: categories.len() as i64 + 1,
            name: new_category.name,
            budget: new_category.budget,
            user_id: new_category.user_id,
        };
        categories.push(category.clone());

        Ok(category)
    }

    fn get(&self, category_id: CategoryId) -> Result<Category, Error> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|category| category.id == category_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_by_user_with_expenses(
        &self,
        user_id: UserID,
    ) -> Result<Vec<CategoryWithExpenses>, Error> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|category| category.user_id == user_id)
            .map(|category| CategoryWithExpenses {
                category: category.clone(),
                expenses: vec![],
            })
            .collect())
    }

    fn update(&self, category_id: CategoryId, update: CategoryUpdate) -> Result<CategoryId, Error> {
        self.update_calls
            .lock()
            .unwrap()
            .push((category_id, update.clone()));

        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|category| category.id == category_id)
            .ok_or(Error::UpdateMissingCategory)?;

        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(budget) = update.budget {
            category.budget = budget;
        }

        Ok(category_id)
    }

    fn delete(&self, category_id: CategoryId) -> Result<CategoryId, Error> {
        self.delete_calls.lock().unwrap().push(category_id);

        let mut categories = self.categories.lock().unwrap();
        let count_before = categories.len();
        categories.retain(|category| category.id != category_id);

        if categories.len() == count_before {
            Err(Error::DeleteMissingCategory)
        } else {
            Ok(category_id)
        }
    }

    fn monthly_statistics(&self, user_id: UserID) -> Result<Vec<MonthlyCategoryStatistics>, Error> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|category| category.user_id == user_id)
            .map(|category| MonthlyCategoryStatistics {
                category_name: category.name.to_string(),
                month: None,
                total_amount: 0.0,
                budget: category.budget.as_f64(),
                remaining: category.budget.as_f64(),
            })
            .collect())
    }
}

#[derive(Clone, Default)]
pub(crate) struct SpyExpenseStore {
    pub expenses: Arc<Mutex<Vec<Expense>>>,
    pub create_calls: Arc<Mutex<Vec<NewExpense>>>,
    pub update_calls: Arc<Mutex<Vec<(ExpenseId, UserID, ExpenseUpdate)>>>,
}

impl ExpenseStore for SpyExpenseStore {
    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error> {
        self.create_calls.lock().unwrap().push(new_expense.clone());

        let mut expenses = self.expenses.lock().unwrap();
        let expense = Expense {
            id: expenses.len() as i64 + 1,
            description: new_expense.description,
            amount: new_expense.amount,
            date: new_expense.date,
            category_id: new_expense.category_id,
            user_id: new_expense.user_id,
        };
        expenses.push(expense.clone());

        Ok(expense)
    }

    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.expenses
            .lock()
            .unwrap()
            .iter()
            .find(|expense| expense.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Expense>, Error> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|expense| expense.user_id == user_id)
            .cloned()
            .collect())
    }

    fn update(
        &self,
        id: ExpenseId,
        user_id: UserID,
        update: ExpenseUpdate,
    ) -> Result<ExpenseId, Error> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id, user_id, update.clone()));

        let mut expenses = self.expenses.lock().unwrap();
        let expense = expenses
            .iter_mut()
            .find(|expense| expense.id == id && expense.user_id == user_id)
            .ok_or(Error::UpdateMissingExpense)?;

        if let Some(description) = update.description {
            expense.description = description;
        }
        if let Some(amount) = update.amount {
            expense.amount = amount;
        }
        if let Some(date) = update.date {
            expense.date = date;
        }

        Ok(id)
    }

    fn delete(&self, id: ExpenseId) -> Result<ExpenseId, Error> {
        let mut expenses = self.expenses.lock().unwrap();
        let count_before = expenses.len();
        expenses.retain(|expense| expense.id != id);

        if expenses.len() == count_before {
            Err(Error::DeleteMissingExpense)
        } else {
            Ok(id)
        }
    }
}
