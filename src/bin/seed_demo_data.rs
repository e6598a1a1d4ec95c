use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use pocket_budget::{
    Budget, CategoryName, Description, ExpenseAmount, NewCategory, NewExpense, NewUser,
    PasswordHash, Role, UserName, ValidatedPassword,
    stores::{CategoryStore, ExpenseStore, UserStore, sqlite::create_app_state},
};

/// The password every demo user logs in with.
const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: [(&str, &str); 2] = [
    ("Demo User", "demo@example.com"),
    ("Sam Saver", "sam@example.com"),
];

/// Category name and monthly budget.
const CATEGORY_TEMPLATES: [(&str, f64); 5] = [
    ("Groceries", 400.0),
    ("Rent", 1200.0),
    ("Transport", 150.0),
    ("Entertainment", 100.0),
    ("Utilities", 200.0),
];

/// Description and amount, logged against each category in turn.
const EXPENSE_TEMPLATES: [(&str, f64); 8] = [
    ("Weekly shop", 86.4),
    ("Monthly rent", 1200.0),
    ("Bus pass", 45.0),
    ("Cinema tickets", 32.5),
    ("Power bill", 118.2),
    ("Farmers market", 27.9),
    ("Train fare", 12.6),
    ("Concert", 75.0),
];

/// A utility for creating a database populated with demo users, categories and expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of expenses to generate, counting back from the current month.
    #[arg(long, default_value_t = 3)]
    months: u8,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let state = create_app_state(Connection::open(output_path)?, "Etc/UTC")?;
    let today = OffsetDateTime::now_utc().date();

    for (name, email) in DEMO_USERS {
        println!("Creating user {email}...");

        let password_hash = PasswordHash::new(
            ValidatedPassword::new_unchecked(DEMO_PASSWORD),
            PasswordHash::DEFAULT_COST,
        )?;
        let user = state.user_store.create(NewUser {
            name: UserName::new_unchecked(name),
            email: email.parse()?,
            password_hash,
            role: Role::User,
        })?;

        let mut category_ids = Vec::with_capacity(CATEGORY_TEMPLATES.len());
        for (category_name, budget) in CATEGORY_TEMPLATES {
            let category = state.category_store.create(NewCategory {
                name: CategoryName::new_unchecked(category_name),
                budget: Budget::new_unchecked(budget),
                user_id: user.id,
            })?;
            category_ids.push(category.id);
        }

        let mut expense_count = 0;
        for month in 0..args.months {
            let month_start = months_before(today, month);

            for (index, (description, amount)) in EXPENSE_TEMPLATES.iter().enumerate() {
                let date = month_start + Duration::days(index as i64 * 3);
                if date > today {
                    continue;
                }

                state.expense_store.create(NewExpense {
                    description: Description::new_unchecked(description),
                    amount: ExpenseAmount::new_unchecked(*amount),
                    date,
                    category_id: category_ids[index % category_ids.len()],
                    user_id: user.id,
                })?;
                expense_count += 1;
            }
        }

        println!(
            "Created {} categories and {expense_count} expenses.",
            category_ids.len()
        );
    }

    println!("Success! Log in with any demo email and the password \"{DEMO_PASSWORD}\".");

    Ok(())
}

/// The first day of the month `months` months before the month containing `date`.
fn months_before(date: Date, months: u8) -> Date {
    let mut month_start = date.replace_day(1).unwrap_or(date);

    for _ in 0..months {
        month_start = (month_start - Duration::days(1))
            .replace_day(1)
            .unwrap_or(month_start);
    }

    month_start
}
