// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality for the HRMS dashboard API.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{generate_secret, AuthRateLimiter, AuthService, CookieConfig, DefaultAuth, TokenIssuer};
use crate::config::Settings;

pub use crate::error::AppError;
pub use crate::router::create_router;

/// Application state shared across all handlers.
/// Built once at startup and never mutated.
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Storage backend
    pub storage: S,
    /// Settings loaded at startup
    pub settings: Arc<Settings>,
    /// Failed-login lockout
    pub login_limiter: Arc<AuthRateLimiter>,
}

impl<S> AppState<S> {
    /// Create the application state. Without a configured signing secret a
    /// random one is generated, so sessions end with the process.
    pub fn new(storage: S, settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let secret = if settings.auth.jwt_secret.is_empty() {
            tracing::warn!("auth.jwt_secret is not set; using a random secret for this process");
            generate_secret()
        } else {
            settings.auth.jwt_secret.clone()
        };
        let tokens = TokenIssuer::new(
            secret.as_bytes(),
            Duration::from_secs(settings.auth.token_ttl_secs),
        );
        let auth = Arc::new(DefaultAuth::new(tokens, settings.auth.password_cost)?);
        let login_limiter = Arc::new(AuthRateLimiter::from_settings(&settings.auth));

        Ok(Self {
            auth,
            storage,
            settings: Arc::new(settings),
            login_limiter,
        })
    }

    /// Attributes of the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            secure: self.settings.auth.cookie_secure,
            max_age: self.auth.token_ttl(),
        }
    }
}
