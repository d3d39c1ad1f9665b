// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers for the login, registration and logout pages.

pub mod auth;
pub mod cookie;
pub mod pages;
