// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! The credential and session manager contract used by the HTTP layer.
use async_trait::async_trait;
use authgate_common::UserId;

use super::Session;
use crate::error::{AuthError, SessionError};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account. The password is hashed before it reaches the store.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserId, AuthError>;

    /// Verify credentials and issue a fresh session. A session the caller
    /// already holds is destroyed first.
    async fn login(
        &self,
        username: &str,
        password: &str,
        current_session: Option<&str>,
    ) -> Result<Session, AuthError>;

    /// Destroy a session. Unknown tokens succeed.
    async fn logout(&self, token: &str) -> Result<(), SessionError>;

    /// Resolve a token to its live session
    async fn current_session(&self, token: &str) -> Result<Option<Session>, SessionError>;
}
