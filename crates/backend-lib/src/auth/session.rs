// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session issuance, lookup and destruction.
use async_trait::async_trait;
use authgate_common::UserId;
use metrics::{counter, gauge};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::debug;

use super::token_generator::generate_secure_token;
use crate::error::SessionError;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};

/// Session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24); // 1 day

/// Authenticated identity held server-side under an opaque token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub is_authenticated: bool,
    pub user_id: UserId,
    pub username: String,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

impl Session {
    pub fn is_expired(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// Server-side session store. Each token is independent; operations are
/// atomic per token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issue a new authenticated session for the user
    async fn create(&self, user_id: UserId, username: &str) -> Result<Session, SessionError>;

    /// Look up a live session; expired and unknown tokens yield `None`
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Destroy a session. Unknown tokens are not an error.
    async fn destroy(&self, token: &str) -> Result<(), SessionError>;
}

/// In-process session store with TTL expiry
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Spawn the task that periodically removes expired sessions
    pub fn spawn_cleanup(&self, interval: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                manager.purge_expired().await;
            }
        })
    }

    /// Remove expired sessions, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();
        let before_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired(now));

        let after_count = sessions.len();
        let removed = before_count - after_count;

        if removed > 0 {
            debug!(removed, active = after_count, "purged expired sessions");
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(after_count as f64);
        }
        removed
    }

    /// Number of stored sessions, expired ones included until the next sweep
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for SessionManager {
    async fn create(&self, user_id: UserId, username: &str) -> Result<Session, SessionError> {
        let token = generate_secure_token()?;
        let now = SystemTime::now();
        let session = Session {
            session_id: token.clone(),
            is_authenticated: true,
            user_id,
            username: username.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token, session.clone());

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);

        Ok(session)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(token)
            .filter(|session| !session.is_expired(SystemTime::now()))
            .cloned())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_management() {
        let manager = SessionManager::default();

        let session = manager.create(7, "gold").await.unwrap();
        assert!(session.is_authenticated);
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "gold");

        let fetched = manager.get(&session.session_id).await.unwrap();
        assert_eq!(fetched, Some(session.clone()));

        assert_eq!(manager.get("invalid_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let manager = SessionManager::default();
        let first = manager.create(1, "gold").await.unwrap();
        let second = manager.create(1, "gold").await.unwrap();
        assert_ne!(first.session_id, second.session_id);

        manager.destroy(&first.session_id).await.unwrap();
        assert_eq!(manager.get(&first.session_id).await.unwrap(), None);
        assert!(manager.get(&second.session_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let manager = SessionManager::default();
        let session = manager.create(1, "gold").await.unwrap();

        manager.destroy(&session.session_id).await.unwrap();
        manager.destroy(&session.session_id).await.unwrap();
        manager.destroy("never-issued").await.unwrap();
        assert!(manager.is_empty().await);
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let manager = SessionManager::new(Duration::ZERO);
        let session = manager.create(1, "gold").await.unwrap();

        assert_eq!(manager.get(&session.session_id).await.unwrap(), None);
        assert_eq!(manager.len().await, 1);
        assert_eq!(manager.purge_expired().await, 1);
        assert!(manager.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_sweeps_expired_sessions() {
        let manager = SessionManager::new(Duration::ZERO);
        manager.create(1, "gold").await.unwrap();

        let handle = manager.spawn_cleanup(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert!(manager.is_empty().await);
        handle.abort();
    }
}
