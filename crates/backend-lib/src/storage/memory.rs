//! In-memory user store for tests and single-process development.
use async_trait::async_trait;
use authgate_common::UserId;
use parking_lot::Mutex;
use std::sync::Arc;

use super::{NewUser, User, UserStore};
use crate::error::{StoreError, StoreErrorKind};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    next_id: UserId,
}

/// Vec-backed store. Check-and-insert runs under one lock, so uniqueness
/// holds across concurrent registrations the way a unique index would.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.inner.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().users.is_empty()
    }

    /// Count users with this exact username
    pub fn count_username(&self, username: &str) -> usize {
        self.inner
            .lock()
            .users
            .iter()
            .filter(|u| u.username == username)
            .count()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn identity_exists(&self, username: &str, email: &str) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .lock()
            .users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn insert(&self, user: NewUser) -> Result<UserId, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner
            .users
            .iter()
            .find(|u| u.username == user.username || u.email == user.email)
        {
            let column = if existing.username == user.username {
                "users_username_key"
            } else {
                "users_email_key"
            };
            return Err(StoreError::new(
                StoreErrorKind::UniqueViolation,
                format!("duplicate key value violates unique constraint \"{column}\""),
            ));
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.users.push(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        });
        Ok(id)
    }
}
