//! Domain service for registration and login.
//!
//! No sessions or tokens are issued; callers only ever get the user's
//! public fields back.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("This email is already registered")]
    EmailTaken,

    #[error("This email is not registered")]
    UnknownEmail,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Registration input. `reason` falls back to a placeholder when absent.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub reason: Option<String>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a new user with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the email is already registered.
    async fn register(&self, input: Registration) -> Result<User, AuthError>;

    /// Verifies credentials and returns the user's public fields.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownEmail`] for an unregistered email and
    /// [`AuthError::WrongPassword`] when verification fails, so callers can
    /// surface distinct messages.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;
}
