// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod cookie;
pub mod extractor;
pub mod password;
pub mod rate_limit;
pub mod secret;
pub mod token;
mod service;
mod service_impl;

pub use cookie::{create_auth_cookie, create_logout_cookie, CookieConfig, AUTH_COOKIE_NAME};
pub use extractor::{ClientIp, CurrentUser};
pub use password::{hash_password, hash_password_secure, verify_password};
pub use rate_limit::AuthRateLimiter;
pub use secret::generate_secret;
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{Claims, TokenIssuer};
