// crates/backend-lib/src/error.rs

//! Central error types.
//!
//! Every error carries internal detail for the server log through `Display`,
//! and a fixed user-facing string through [`AuthError::sanitized_message`].
//! The two are never mixed.
use crate::validation::ValidationError;
use thiserror::Error;

/// Failure category reported by a user store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// A unique index rejected the write
    UniqueViolation,
    /// The backend could not be reached (pool closed, timeout, I/O)
    Unavailable,
    /// The statement failed for any other reason
    Query,
    /// A row could not be decoded into a user
    Corrupt,
}

/// Structured user store error: a kind plus driver detail for the log
#[derive(Error, Debug, Clone)]
#[error("store error ({kind:?}): {detail}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub detail: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.kind == StoreErrorKind::UniqueViolation
    }
}

/// Failure category reported by a session store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// The OS random source failed while minting a token
    TokenGeneration,
    /// The backing store rejected the operation
    Backend,
}

#[derive(Error, Debug, Clone)]
#[error("session error ({kind:?}): {detail}")]
pub struct SessionError {
    pub kind: SessionErrorKind,
    pub detail: String,
}

impl SessionError {
    pub fn new(kind: SessionErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Which user flow an error is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Registration,
}

/// Errors returned by the credential and session manager
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("username or email already registered")]
    DuplicateIdentity,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::PasswordMismatch => "REG_001",
            AuthError::Validation(_) => "VAL_001",
            AuthError::DuplicateIdentity => "REG_002",
            AuthError::InvalidCredentials => "AUTH_001",
            AuthError::Store(_) => "STORE_001",
            AuthError::Session(_) => "SESSION_001",
            AuthError::Hashing(_) => "HASH_001",
        }
    }

    /// True for failures caused by the server rather than the submitted form
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Store(_) | AuthError::Session(_) | AuthError::Hashing(_)
        )
    }

    /// Get a sanitized message suitable for showing to the user
    pub fn sanitized_message(&self, flow: AuthFlow) -> &'static str {
        match (self, flow) {
            (AuthError::PasswordMismatch, _) => "Passwords do not match.",
            (AuthError::Validation(err), _) => err.user_message(),
            (AuthError::DuplicateIdentity, _) => "Username or Email already in use.",
            (AuthError::InvalidCredentials, _) => "Invalid username or password.",
            (AuthError::Store(_), AuthFlow::Login) => "A database error occurred during login.",
            (_, AuthFlow::Login) => "An unexpected error occurred during login.",
            (_, AuthFlow::Registration) => "An unexpected error occurred during registration.",
        }
    }
}
