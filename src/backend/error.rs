use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

// Anything a handler cannot turn into a user-visible form or flash message
// ends up here and becomes a 500. Expected failures (duplicate username,
// failed login) are handled where they occur and never reach this type.
#[derive(Debug)]
pub enum AppError {
    Sqlx(sqlx::Error),
    PasswordHash(argon2::password_hash::Error),
    Session(tower_sessions::session::Error),
    Template(tera::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(inner: sqlx::Error) -> Self {
        AppError::Sqlx(inner)
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(inner: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(inner)
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(inner: tower_sessions::session::Error) -> Self {
        AppError::Session(inner)
    }
}

impl From<tera::Error> for AppError {
    fn from(inner: tera::Error) -> Self {
        AppError::Template(inner)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Sqlx(e) => tracing::error!("Database error: {}", e),
            AppError::PasswordHash(e) => tracing::error!("Password hashing error: {}", e),
            AppError::Session(e) => tracing::error!("Session error: {}", e),
            AppError::Template(e) => tracing::error!("Template error: {}", e),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
