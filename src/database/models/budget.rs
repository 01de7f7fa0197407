use serde::Serialize;
use sqlx::FromRow;

// One row per (user, month, year); overwritten in place by the upsert.
#[derive(FromRow, Debug, Serialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub month: i64,
    pub year: i64,
}
