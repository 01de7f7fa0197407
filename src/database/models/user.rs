use serde::Serialize;
use sqlx::FromRow;

#[derive(FromRow, Debug, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    // argon2 hash string, never the plaintext
    #[serde(skip)]
    pub password: String,
}
