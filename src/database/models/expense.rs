use serde::Serialize;
use sqlx::FromRow;

#[derive(FromRow, Debug, Serialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub amount: f64,
    pub category_id: i64,
    pub date: String, // "%Y-%m-%d %H:%M:%S", stamped server-side at creation
}

// Read-side shape for the tracker table: expense joined with its category name
#[derive(FromRow, Debug, Serialize)]
pub struct ExpenseWithCategory {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category_name: String,
    pub date: String,
}
