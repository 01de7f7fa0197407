//! Session helpers so handlers only deal with login state and flash notices,
//! not raw cookie plumbing.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use std::env;
use tower_sessions::{cookie::Key, Session};

use crate::backend::AppError;

const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";
const FLASH_KEY: &str = "_flashes";

// Signing key for the session cookie. A generated key is fine for local runs
// but invalidates every session on restart.
pub(crate) fn signing_key() -> Key {
    match env::var("SESSION_SECRET") {
        Ok(secret) => Key::derive_from(secret.as_bytes()),
        Err(_) => {
            tracing::warn!("SESSION_SECRET not set, using a generated key (sessions reset on restart)");
            Key::generate()
        }
    }
}

// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

/// Thin wrapper over the framework session exposing domain-level operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    // Store the logged-in user's id and username in the session cookie state.
    pub async fn persist_user(&self, user_id: i64, username: &str) -> Result<(), AppError> {
        self.0.insert(USER_ID_KEY, user_id).await?;
        self.0.insert(USERNAME_KEY, username).await?;
        Ok(())
    }

    pub async fn user_id(&self) -> Result<Option<i64>, AppError> {
        Ok(self.0.get::<i64>(USER_ID_KEY).await?)
    }

    // Drop every piece of session state, login and flashes alike.
    pub async fn clear(&self) {
        self.0.clear().await;
    }

    pub async fn flash(&self, level: &str, message: &str) -> Result<(), AppError> {
        let mut flashes: Vec<Flash> = self.0.get(FLASH_KEY).await?.unwrap_or_default();
        flashes.push(Flash {
            level: level.to_string(),
            message: message.to_string(),
        });
        self.0.insert(FLASH_KEY, &flashes).await?;
        Ok(())
    }

    // Pending notices, removed from the session as they are read.
    pub async fn take_flashes(&self) -> Result<Vec<Flash>, AppError> {
        Ok(self.0.remove::<Vec<Flash>>(FLASH_KEY).await?.unwrap_or_default())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state)
            .await
            .map(SessionContext::new)
    }
}

/// The authenticated user, extracted from the session. Routes that take this
/// as an argument are the protected ones: a request without a logged-in user
/// is redirected to the login page with no side effect.
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;

        // Tampered or stale session values read as "not logged in".
        let user_id = match session.get::<i64>(USER_ID_KEY).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("unreadable user id in session: {}", e);
                None
            }
        };
        let username = match session.get::<String>(USERNAME_KEY).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("unreadable username in session: {}", e);
                None
            }
        };

        match (user_id, username) {
            (Some(id), Some(username)) => Ok(AuthUser { id, username }),
            _ => Err(Redirect::to("/login")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A configured secret must yield the same key on every start, or no
    // session would survive a restart.
    #[test]
    fn derived_keys_are_stable_for_the_same_secret() {
        let material = b"an-example-secret-of-at-least-32-bytes";
        let first = Key::derive_from(material);
        let second = Key::derive_from(material);
        assert_eq!(first.master(), second.master());
        assert_eq!(first.signing().len(), 32);
    }

    #[test]
    fn different_secrets_derive_different_keys() {
        let first = Key::derive_from(b"the-first-secret-material-padded-to-length");
        let second = Key::derive_from(b"the-second-secret-material-padded-length");
        assert_ne!(first.master(), second.master());
    }
}
