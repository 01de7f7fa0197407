mod error;
mod forms;
mod handlers;
mod routes;
mod session;
mod views;

pub use error::AppError;

use axum::{routing::get, Router};
use sqlx::{Pool, Sqlite};
use std::net::SocketAddr;
use std::sync::Arc;
use tera::Tera;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub templates: Arc<Tera>,
}

// Builds the full application router; tests drive this directly.
pub fn app(pool: Pool<Sqlite>) -> anyhow::Result<Router> {
    let state = AppState {
        db: pool,
        templates: Arc::new(views::templates()?),
    };

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name("session")
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnSessionEnd)
        .with_signed(session::signing_key());

    let router = Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .merge(routes::app_routes())
        .layer(session_layer)
        .with_state(state);

    Ok(router)
}

pub async fn run_server(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let app = app(pool)?;

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
