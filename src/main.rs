// src/main.rs
use dotenvy::dotenv;
use expense_tracker::{backend, database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "expense_tracker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = database::db::connection::get_db_pool().await?;
    database::db::migrate::run_migrations(&pool).await?;

    backend::run_server(pool).await?;
    Ok(())
}
