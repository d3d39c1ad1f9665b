// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const REGISTER_SUCCESS: &str = "auth.register.success";
pub const REGISTER_FAILURE: &str = "auth.register.failure";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const LOGOUT: &str = "auth.logout";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
