//! Test utilities shared by the integration tests
//!
//! Provides cheap-hashing settings, wired services over in-memory stores,
//! and store fakes that fail in controlled ways.
#![allow(dead_code)]

use async_trait::async_trait;
use authgate_backend::{
    auth::{DefaultAuth, Session, SessionManager, SessionStore},
    config::{HashingSettings, Settings},
    error::{SessionError, SessionErrorKind, StoreError, StoreErrorKind},
    storage::{MemoryUserStore, NewUser, User, UserStore},
    AppState,
};
use authgate_common::UserId;
use std::sync::Arc;

pub const GOLD_PASSWORD: &str = "smiths123ABC$";

/// Default settings with a minimal hashing work factor
pub fn fast_settings() -> Settings {
    Settings {
        hashing: HashingSettings::fast_for_tests(),
        ..Settings::default()
    }
}

/// Auth service over fresh in-memory stores, returning the stores for inspection
pub fn setup_auth() -> (Arc<DefaultAuth>, MemoryUserStore, SessionManager) {
    let users = MemoryUserStore::new();
    let sessions = SessionManager::default();
    let auth = auth_over(Arc::new(users.clone()), Arc::new(sessions.clone()));
    (auth, users, sessions)
}

pub fn auth_over(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Arc<DefaultAuth> {
    let settings = fast_settings();
    Arc::new(
        DefaultAuth::new(
            users,
            sessions,
            &settings.hashing,
            settings.password_requirements,
        )
        .expect("auth service"),
    )
}

/// App state over fresh in-memory stores
pub fn setup_state(settings: Settings) -> (Arc<AppState>, MemoryUserStore, SessionManager) {
    let users = MemoryUserStore::new();
    let sessions = SessionManager::default();
    let state = AppState::new(Arc::new(users.clone()), Arc::new(sessions.clone()), settings)
        .expect("app state");
    (Arc::new(state), users, sessions)
}

/// Every call fails as if the database were unreachable
pub struct UnavailableUserStore;

fn unavailable() -> StoreError {
    StoreError::new(
        StoreErrorKind::Unavailable,
        "connection refused (os error 111) at db.internal:5432",
    )
}

#[async_trait]
impl UserStore for UnavailableUserStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Err(unavailable())
    }

    async fn identity_exists(&self, _username: &str, _email: &str) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _user: NewUser) -> Result<UserId, StoreError> {
        Err(unavailable())
    }
}

/// Skips the duplicate pre-check, as if a concurrent registration committed
/// between the check and the insert
pub struct RacingUserStore(pub MemoryUserStore);

#[async_trait]
impl UserStore for RacingUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.0.find_by_username(username).await
    }

    async fn identity_exists(&self, _username: &str, _email: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn insert(&self, user: NewUser) -> Result<UserId, StoreError> {
        self.0.insert(user).await
    }
}

/// Sessions work except that destroy always fails
pub struct BrokenDestroySessionStore(pub SessionManager);

#[async_trait]
impl SessionStore for BrokenDestroySessionStore {
    async fn create(&self, user_id: UserId, username: &str) -> Result<Session, SessionError> {
        self.0.create(user_id, username).await
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        self.0.get(token).await
    }

    async fn destroy(&self, _token: &str) -> Result<(), SessionError> {
        Err(SessionError::new(SessionErrorKind::Backend, "session backend offline"))
    }
}
