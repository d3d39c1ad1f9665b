use async_trait::async_trait;
use authgate_common::UserId;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use zeroize::Zeroizing;

use super::{AuthService, PasswordHasher, PasswordRequirements, Session, SessionStore};
use crate::config::HashingSettings;
use crate::error::{AuthError, SessionError};
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS, LOGOUT, REGISTER_FAILURE, REGISTER_SUCCESS};
use crate::storage::{NewUser, UserStore};
use crate::validation;

/// Default credential and session manager over injected stores.
///
/// Hashing and verification run on the blocking pool so a slow hash never
/// stalls other requests on the same executor thread.
pub struct DefaultAuth {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: PasswordHasher,
    requirements: PasswordRequirements,
    dummy_hash: Arc<str>,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        hashing: &HashingSettings,
        requirements: PasswordRequirements,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(hashing)?;
        let dummy_hash = hasher.dummy_hash()?.into();
        Ok(Self {
            users,
            sessions,
            hasher,
            requirements,
            dummy_hash,
        })
    }

    async fn hash_blocking(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify_blocking(&self, hash: String, password: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn try_register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserId, AuthError> {
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let username = validation::normalize_username(username);
        let email = validation::normalize_email(email);
        validation::validate_registration(username, &email, password, &self.requirements)?;

        if self.users.identity_exists(username, &email).await? {
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = self.hash_blocking(password).await?;
        let new_user = NewUser {
            username: username.to_string(),
            email,
            password_hash,
        };

        // the unique index is authoritative; losing a race to a concurrent
        // registration lands here rather than in the pre-check above
        match self.users.insert(new_user).await {
            Ok(id) => Ok(id),
            Err(e) if e.is_unique_violation() => {
                debug!(detail = %e.detail, "unique constraint rejected registration");
                Err(AuthError::DuplicateIdentity)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn try_login(
        &self,
        username: &str,
        password: &str,
        current_session: Option<&str>,
    ) -> Result<Session, AuthError> {
        let user = self.users.find_by_username(username).await?;

        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };
        let matched = self.verify_blocking(hash, password).await?;

        let user = match user {
            Some(user) if matched => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        if let Some(previous) = current_session {
            if let Err(e) = self.sessions.destroy(previous).await {
                warn!(error = %e, "failed to destroy previous session on re-login");
            }
        }

        Ok(self.sessions.create(user.id, &user.username).await?)
    }
}

fn log_failure(operation: &'static str, err: &AuthError) {
    if err.is_internal() {
        error!(operation, code = err.error_code(), error = %err, "auth operation failed");
    } else {
        debug!(operation, code = err.error_code(), reason = %err, "auth operation rejected");
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[instrument(skip(self, email, password, confirm_password))]
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserId, AuthError> {
        let result = self
            .try_register(username, email, password, confirm_password)
            .await;
        match &result {
            Ok(user_id) => {
                counter!(REGISTER_SUCCESS).increment(1);
                info!(user_id, "user registered");
            }
            Err(e) => {
                counter!(REGISTER_FAILURE).increment(1);
                log_failure("register", e);
            }
        }
        result
    }

    #[instrument(skip(self, password, current_session))]
    async fn login(
        &self,
        username: &str,
        password: &str,
        current_session: Option<&str>,
    ) -> Result<Session, AuthError> {
        let result = self.try_login(username, password, current_session).await;
        match &result {
            Ok(session) => {
                counter!(LOGIN_SUCCESS).increment(1);
                info!(user_id = session.user_id, "login succeeded");
            }
            Err(e) => {
                counter!(LOGIN_FAILURE).increment(1);
                log_failure("login", e);
            }
        }
        result
    }

    #[instrument(skip_all)]
    async fn logout(&self, token: &str) -> Result<(), SessionError> {
        counter!(LOGOUT).increment(1);
        self.sessions.destroy(token).await
    }

    #[instrument(skip_all)]
    async fn current_session(&self, token: &str) -> Result<Option<Session>, SessionError> {
        self.sessions.get(token).await
    }
}
