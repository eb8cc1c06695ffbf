// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP: &str = "auth.signup";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const LOGIN_LOCKOUT: &str = "auth.login.lockout";
pub const TOKEN_REJECTED: &str = "auth.token.rejected";
pub const STORAGE_WRITE: &str = "storage.write";
