// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! User store abstraction with in-memory and Postgres implementations.
use async_trait::async_trait;
use authgate_common::UserId;
use std::fmt;

use crate::error::StoreError;

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// A persisted account
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Row to insert. `email` must already be normalized.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Trait for user store backends
///
/// `insert` must enforce uniqueness of `username` and `email` atomically and
/// report a violation as [`StoreErrorKind::UniqueViolation`](crate::error::StoreErrorKind).
/// `identity_exists` is only a fast path for a friendlier error.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// True if any user has this username or this (normalized) email
    async fn identity_exists(&self, username: &str, email: &str) -> Result<bool, StoreError>;

    /// Insert a user, returning the id assigned by the store
    async fn insert(&self, user: NewUser) -> Result<UserId, StoreError>;
}
