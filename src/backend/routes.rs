use axum::{routing::get, Router};

use crate::backend::{handlers, AppState};

pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/tracker", get(handlers::tracker_page).post(handlers::add_expense))
        .route("/set-budget", get(handlers::budget_page).post(handlers::set_budget))
        .route("/delete/:expense_id", get(handlers::delete_expense))
        .route("/chart-data", get(handlers::chart_data))
}
