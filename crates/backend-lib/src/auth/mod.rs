// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod session;
pub mod token_generator;
mod service;
mod service_impl;

pub use password::{
    validate_password_strength, PasswordHasher, PasswordRequirements, MIN_PASSWORD_LENGTH,
};
pub use session::{Session, SessionManager, SessionStore, SESSION_TTL};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
