// ================
// crates/common/src/lib.rs
// ================
//! Common types shared between the `authgate` HTTP layer and its callers.
//! Form payloads are decoded from `application/x-www-form-urlencoded` bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a user by the user store on insert
pub type UserId = i64;

/// Fields posted by the login form
///
/// Missing fields decode as empty strings so the auth layer, not the
/// extractor, decides how to reject them.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Fields posted by the registration form
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query string accepted by `GET /login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    /// `true` after a successful registration redirect; any other value is ignored
    pub registered: Option<String>,
}

impl LoginQuery {
    /// Whether the login form should show the registration notice
    pub fn just_registered(&self) -> bool {
        self.registered.as_deref() == Some("true")
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}
