use serde::Serialize;
use sqlx::FromRow;

#[derive(FromRow, Debug, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
