use anyhow::Result;
use sqlx::{Pool, Sqlite};

// Creates the four tables and seeds the default categories. Safe to run on
// every startup: the schema uses IF NOT EXISTS and the seed uses OR IGNORE.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
