//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::config::AuthConfig;
use crate::db::Store;
use crate::db::repositories::user::{hash_password, verify_password};
use crate::services::auth_service::{AuthError, AuthService, Registration};

const DEFAULT_REASON: &str = "No reason given";

pub struct SeaOrmAuthService {
    store: Store,
    config: AuthConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: AuthConfig) -> Self {
        Self { store, config }
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.to_string().contains("UNIQUE constraint")
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, input: Registration) -> Result<crate::db::User, AuthError> {
        if input.email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        if input.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }

        // Fast path for the friendly error; the unique column is the backstop
        // when two registrations race past this check.
        if self.store.user_email_exists(&input.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let config = self.config.clone();
        let password = input.password.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task panicked: {e}")))??;

        // The admin flag is seeded exactly once, here; read paths only ever
        // consult the stored column.
        let is_admin = self.config.admin_email.as_deref() == Some(input.email.as_str());
        let reason = input.reason.as_deref().unwrap_or(DEFAULT_REASON);

        match self
            .store
            .create_user(&input.email, &password_hash, &input.name, reason, is_admin)
            .await
        {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<crate::db::User, AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let Some((user, password_hash)) = self.store.get_user_by_email_with_hash(email).await?
        else {
            return Err(AuthError::UnknownEmail);
        };

        let is_valid = verify_password(password_hash, password.to_string()).await?;
        if !is_valid {
            return Err(AuthError::WrongPassword);
        }

        Ok(user)
    }
}
