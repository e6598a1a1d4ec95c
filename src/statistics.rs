//! Spending totals per category and month, and how a month's spending compares to the budget.

use serde::Serialize;
use time::Date;

use crate::{category::CategoryWithExpenses, expense::iso_date};

/// The total spent in a category for one calendar month.
///
/// A category without any expenses is reported once with `month` set to `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCategoryStatistics {
    /// The name of the category.
    pub category_name: String,
    /// The first day of the month, or `None` for a category without expenses.
    #[serde(with = "iso_date::option")]
    pub month: Option<Date>,
    /// The sum of the category's expenses in the month.
    pub total_amount: f64,
    /// The monthly budget of the category.
    pub budget: f64,
    /// `budget` minus `total_amount`, negative when the budget was exceeded.
    pub remaining: f64,
}

/// Spending above this percentage of the budget is close to the limit.
pub const NEAR_LIMIT_PERCENTAGE: i64 = 80;

/// How total spending compares to the total budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    /// Less than [NEAR_LIMIT_PERCENTAGE] percent of the budget has been spent.
    OnTrack,
    /// Between [NEAR_LIMIT_PERCENTAGE] and 100 percent (inclusive) of the budget has been spent.
    NearLimit,
    /// More than the budget has been spent.
    Exceeded,
}

/// The spending for a period against the budget for that period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// The total spent across all categories.
    pub total_spent: f64,
    /// The sum of the budgets of all categories.
    pub total_budget: f64,
    /// `total_spent` as a percentage of `total_budget`, rounded to the nearest integer.
    pub percentage: i64,
    /// Which threshold, if any, spending has crossed.
    pub level: BudgetLevel,
}

impl BudgetStatus {
    /// Compare `total_spent` to `total_budget`.
    ///
    /// A zero budget always reports zero percent.
    pub fn from_totals(total_spent: f64, total_budget: f64) -> Self {
        let percentage = if total_budget > 0.0 {
            (total_spent / total_budget * 100.0).round() as i64
        } else {
            0
        };

        let level = if percentage > 100 {
            BudgetLevel::Exceeded
        } else if percentage >= NEAR_LIMIT_PERCENTAGE {
            BudgetLevel::NearLimit
        } else {
            BudgetLevel::OnTrack
        };

        Self {
            total_spent,
            total_budget,
            percentage,
            level,
        }
    }

    /// The status of the month containing `month` across all of `categories`.
    ///
    /// Only expenses dated in the same calendar month as `month` count as spent, while every
    /// category contributes its full budget.
    pub fn for_month(categories: &[CategoryWithExpenses], month: Date) -> Self {
        let total_budget = categories
            .iter()
            .map(|category| category.category.budget.as_f64())
            .sum();

        let total_spent = categories
            .iter()
            .flat_map(|category| category.expenses.iter())
            .filter(|expense| {
                expense.date.year() == month.year() && expense.date.month() == month.month()
            })
            .map(|expense| expense.amount.as_f64())
            .sum();

        Self::from_totals(total_spent, total_budget)
    }

    /// The notification to show the user, if spending has crossed a threshold.
    pub fn message(&self) -> Option<String> {
        match self.level {
            BudgetLevel::OnTrack => None,
            BudgetLevel::NearLimit => Some(format!(
                "You have reached {}% of your total budget for this month.",
                self.percentage
            )),
            BudgetLevel::Exceeded => Some(format!(
                "You have exceeded your total budget for this month. Spent: ${:.2} / Budget: ${:.2}",
                self.total_spent, self.total_budget
            )),
        }
    }
}

#[cfg(test)]
mod budget_status_tests {
    use time::macros::date;

    use crate::{
        category::{Budget, Category, CategoryName, CategoryWithExpenses},
        expense::{Description, Expense, ExpenseAmount},
        statistics::{BudgetLevel, BudgetStatus},
        user::UserID,
    };

    #[test]
    fn below_eighty_percent_is_on_track() {
        let status = BudgetStatus::from_totals(79.0, 100.0);

        assert_eq!(status.level, BudgetLevel::OnTrack);
        assert_eq!(status.message(), None);
    }

    #[test]
    fn eighty_percent_is_near_limit() {
        let status = BudgetStatus::from_totals(80.0, 100.0);

        assert_eq!(status.percentage, 80);
        assert_eq!(status.level, BudgetLevel::NearLimit);
    }

    #[test]
    fn one_hundred_percent_is_near_limit() {
        let status = BudgetStatus::from_totals(100.0, 100.0);

        assert_eq!(status.level, BudgetLevel::NearLimit);
    }

    #[test]
    fn one_hundred_and_one_percent_is_exceeded() {
        let status = BudgetStatus::from_totals(101.0, 100.0);

        assert_eq!(status.level, BudgetLevel::Exceeded);
        assert_eq!(
            status.message().as_deref(),
            Some(
                "You have exceeded your total budget for this month. Spent: $101.00 / Budget: $100.00"
            )
        );
    }

    #[test]
    fn percentage_is_rounded() {
        // 79.6% rounds up into the near limit band.
        let status = BudgetStatus::from_totals(79.6, 100.0);

        assert_eq!(status.percentage, 80);
        assert_eq!(status.level, BudgetLevel::NearLimit);
    }

    #[test]
    fn zero_budget_is_zero_percent() {
        let status = BudgetStatus::from_totals(50.0, 0.0);

        assert_eq!(status.percentage, 0);
        assert_eq!(status.level, BudgetLevel::OnTrack);
    }

    #[test]
    fn for_month_only_counts_expenses_in_month() {
        let user_id = UserID::new(1);
        let expense = |id, amount, date| Expense {
            id,
            description: Description::new_unchecked("Groceries"),
            amount: ExpenseAmount::new_unchecked(amount),
            date,
            category_id: 1,
            user_id,
        };
        let categories = vec![
            CategoryWithExpenses {
                category: Category {
                    id: 1,
                    name: CategoryName::new_unchecked("Food"),
                    budget: Budget::new_unchecked(150.0),
                    user_id,
                },
                expenses: vec![
                    expense(1, 90.0, date!(2024 - 05 - 02)),
                    expense(2, 500.0, date!(2024 - 04 - 30)),
                ],
            },
            CategoryWithExpenses {
                category: Category {
                    id: 2,
                    name: CategoryName::new_unchecked("Rent"),
                    budget: Budget::new_unchecked(50.0),
                    user_id,
                },
                expenses: vec![],
            },
        ];

        let status = BudgetStatus::for_month(&categories, date!(2024 - 05 - 20));

        assert_eq!(status.total_spent, 90.0);
        assert_eq!(status.total_budget, 200.0);
        assert_eq!(status.percentage, 45);
        assert_eq!(status.level, BudgetLevel::OnTrack);
    }
}
