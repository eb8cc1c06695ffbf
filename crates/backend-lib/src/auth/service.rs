use std::time::Duration;

use async_trait::async_trait;
use hrms_common::Id;

use super::Claims;
use crate::error::AppError;

/// Credential and session operations used by the handlers
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Hash a plaintext password; the plaintext is zeroized afterwards
    async fn hash_password(&self, plain: String) -> Result<String, AppError>;

    /// Check `plain` against `hash`. A missing hash (unknown account)
    /// costs the same as a wrong password and always fails.
    async fn verify_password(&self, hash: Option<String>, plain: String) -> Result<bool, AppError>;

    /// Sign a session token for a user
    fn issue_token(&self, user_id: Id, email: &str) -> Result<String, AppError>;

    /// Verify a session token; any failure is [`AppError::InvalidToken`]
    fn verify_token(&self, token: &str) -> Result<Claims, AppError>;

    /// Lifetime of issued tokens
    fn token_ttl(&self) -> Duration;
}
