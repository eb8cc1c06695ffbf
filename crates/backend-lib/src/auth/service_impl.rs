use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hrms_common::Id;
use metrics::counter;
use zeroize::Zeroize;

use super::{hash_password, hash_password_secure, verify_password, AuthService, Claims, TokenIssuer};
use crate::error::AppError;
use crate::metrics::TOKEN_REJECTED;

/// scrypt hashing on the blocking pool plus HS256 tokens
pub struct DefaultAuth {
    tokens: TokenIssuer,
    password_cost: u8,
    /// Verified against when the account does not exist
    dummy_hash: Arc<str>,
}

impl DefaultAuth {
    pub fn new(tokens: TokenIssuer, password_cost: u8) -> anyhow::Result<Self> {
        let dummy_hash = hash_password("dummy-password-for-timing", password_cost)?;
        Ok(Self {
            tokens,
            password_cost,
            dummy_hash: dummy_hash.into(),
        })
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn hash_password(&self, mut plain: String) -> Result<String, AppError> {
        let cost = self.password_cost;
        tokio::task::spawn_blocking(move || hash_password_secure(&mut plain, cost))
            .await?
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn verify_password(&self, hash: Option<String>, mut plain: String) -> Result<bool, AppError> {
        let known = hash.is_some();
        let hash = hash.unwrap_or_else(|| self.dummy_hash.to_string());
        let matched = tokio::task::spawn_blocking(move || {
            let ok = verify_password(&hash, &plain);
            plain.zeroize();
            ok
        })
        .await?;
        Ok(known && matched)
    }

    fn issue_token(&self, user_id: Id, email: &str) -> Result<String, AppError> {
        Ok(self.tokens.issue(user_id, email)?)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        self.tokens.verify(token).map_err(|e| {
            counter!(TOKEN_REJECTED).increment(1);
            tracing::debug!("token verification failed: {e}");
            AppError::InvalidToken
        })
    }

    fn token_ttl(&self) -> Duration {
        self.tokens.ttl()
    }
}
