// ============================
// crates/backend-lib/src/auth/extractor.rs
// ============================
//! Request extractors for the caller's identity.
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use hrms_common::Id;

use super::{cookie::token_from_headers, Claims};
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// Authenticated caller, taken from the session cookie.
///
/// Rejects with [`AppError::MissingCredential`] (401) when there is no
/// cookie and [`AppError::InvalidToken`] (403) when it does not verify.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Id,
    pub email: String,
    pub claims: Claims,
}

impl<S: Storage> FromRequestParts<Arc<AppState<S>>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(AppError::MissingCredential)?;
        let claims = state.auth.verify_token(&token)?;
        let user_id = claims.user_id().ok_or(AppError::InvalidToken)?;
        Ok(Self {
            user_id,
            email: claims.email.clone(),
            claims,
        })
    }
}

/// Client address for login throttling: `X-Real-IP` when
/// `server.trust_proxy` is set and the header parses, else the peer
/// address, else `0.0.0.0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

impl<S: Storage> FromRequestParts<Arc<AppState<S>>> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let forwarded = state
            .settings
            .server
            .trust_proxy
            .then(|| parts.headers.get("x-real-ip"))
            .flatten()
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(Self(
            forwarded
                .or(peer)
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        ))
    }
}
