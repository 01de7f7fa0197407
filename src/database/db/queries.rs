use sqlx::{Pool, Sqlite};

use crate::database::models::{Budget, Category, Expense, ExpenseWithCategory, User};

/*
This file contains the specific SQL queries,
CRUD (Create, Read, Update, Delete) logic
and is responsible for interacting with the database.
 */

/*==========User Queries===========*/

// Create user (password arrives already hashed)
pub async fn create_user(
    pool: &Pool<Sqlite>,
    username: &str,
    password_hash: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, password)
        VALUES (?, ?)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

// Look a user up by username (login path)
pub async fn get_user_by_username(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/*==========Category Queries===========*/

pub async fn get_all_categories(pool: &Pool<Sqlite>) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

/*==========Expense Queries===========*/

// Create an expense; `date` is the server-stamped "%Y-%m-%d %H:%M:%S" string
pub async fn create_expense(
    pool: &Pool<Sqlite>,
    user_id: i64,
    description: &str,
    amount: f64,
    category_id: i64,
    date: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO expenses (user_id, description, amount, category_id, date)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(description)
    .bind(amount)
    .bind(category_id)
    .bind(date)
    .fetch_one(pool)
    .await
}

pub async fn get_expense(
    pool: &Pool<Sqlite>,
    expense_id: i64,
) -> Result<Option<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, description, amount, category_id, date
        FROM expenses
        WHERE id = ?
        "#,
    )
    .bind(expense_id)
    .fetch_optional(pool)
    .await
}

// List a user's expenses joined with their category name, newest first.
// `id DESC` breaks ties between rows stamped within the same second.
pub async fn list_expenses(
    pool: &Pool<Sqlite>,
    user_id: i64,
    category_id: Option<i64>,
) -> Result<Vec<ExpenseWithCategory>, sqlx::Error> {
    if let Some(category_id) = category_id {
        sqlx::query_as::<_, ExpenseWithCategory>(
            r#"
            SELECT e.id, e.description, e.amount, c.name AS category_name, e.date
            FROM expenses e JOIN categories c ON e.category_id = c.id
            WHERE e.user_id = ? AND c.id = ?
            ORDER BY e.date DESC, e.id DESC
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, ExpenseWithCategory>(
            r#"
            SELECT e.id, e.description, e.amount, c.name AS category_name, e.date
            FROM expenses e JOIN categories c ON e.category_id = c.id
            WHERE e.user_id = ?
            ORDER BY e.date DESC, e.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

// Delete an expense, scoped to its owner. Unknown ids (or rows belonging to
// somebody else) affect zero rows, which callers treat as a quiet no-op.
pub async fn delete_expense(
    pool: &Pool<Sqlite>,
    user_id: i64,
    expense_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND user_id = ?")
        .bind(expense_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// Total spent by a user in the given calendar month; 0 when nothing recorded
pub async fn monthly_spent(
    pool: &Pool<Sqlite>,
    user_id: i64,
    month: u32,
    year: i32,
) -> Result<f64, sqlx::Error> {
    let spent = sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT SUM(amount) FROM expenses
        WHERE user_id = ? AND strftime('%m', date) = ? AND strftime('%Y', date) = ?
        "#,
    )
    .bind(user_id)
    .bind(format!("{:02}", month))
    .bind(year.to_string())
    .fetch_one(pool)
    .await?;

    Ok(spent.unwrap_or(0.0))
}

/*==========Budget Queries===========*/

// Insert or overwrite the budget for (user, month, year)
pub async fn upsert_budget(
    pool: &Pool<Sqlite>,
    user_id: i64,
    amount: f64,
    month: u32,
    year: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO budget (user_id, amount, month, year)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id, month, year)
        DO UPDATE SET amount = excluded.amount
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .bind(month)
    .bind(year)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_budget(
    pool: &Pool<Sqlite>,
    user_id: i64,
    month: u32,
    year: i32,
) -> Result<Option<Budget>, sqlx::Error> {
    sqlx::query_as::<_, Budget>(
        r#"
        SELECT id, user_id, amount, month, year
        FROM budget
        WHERE user_id = ? AND month = ? AND year = ?
        "#,
    )
    .bind(user_id)
    .bind(month)
    .bind(year)
    .fetch_optional(pool)
    .await
}

/*==========Chart Queries===========*/

// Per-category spend for a user in the given month; categories with no spend
// that month simply produce no row.
pub async fn spend_by_category(
    pool: &Pool<Sqlite>,
    user_id: i64,
    month: u32,
    year: i32,
) -> Result<Vec<(String, f64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, f64)>(
        r#"
        SELECT c.name, SUM(e.amount)
        FROM expenses e JOIN categories c ON e.category_id = c.id
        WHERE e.user_id = ? AND strftime('%m', e.date) = ? AND strftime('%Y', e.date) = ?
        GROUP BY c.name
        "#,
    )
    .bind(user_id)
    .bind(format!("{:02}", month))
    .bind(year.to_string())
    .fetch_all(pool)
    .await
}
