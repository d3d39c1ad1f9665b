// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality for the `authgate` session authentication server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, SessionStore};
use crate::config::Settings;
use crate::error::AuthError;
use crate::storage::UserStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the default auth service over the given stores
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        settings: Settings,
    ) -> Result<Self, AuthError> {
        let auth = DefaultAuth::new(
            users,
            sessions,
            &settings.hashing,
            settings.password_requirements.clone(),
        )?;
        Ok(Self::with_auth(Arc::new(auth), settings))
    }

    /// Use a custom auth service
    pub fn with_auth(auth: Arc<dyn AuthService>, settings: Settings) -> Self {
        Self {
            auth,
            settings: Arc::new(settings),
        }
    }
}
