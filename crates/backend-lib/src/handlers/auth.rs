// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Signup, login, and session handlers.
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hrms_common::{
    requests::{ForgotPasswordRequest, LoginRequest, SignupRequest},
    responses::{AuthResponse, MessageResponse, UserProfile, UserResponse},
    Role, User,
};
use metrics::counter;
use serde_json::json;

use crate::auth::{create_auth_cookie, create_logout_cookie, ClientIp, CurrentUser};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS, SIGNUP};
use crate::storage::{Filter, Storage};
use crate::validation::{present, present_raw, validate_email, ValidationError};
use crate::AppState;

/// Largest accepted profile picture (5MB)
pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

/// Multipart field carrying the profile picture
const PICTURE_FIELD: &str = "profilePicture";

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

/// Text fields plus the optional picture of a multipart signup
async fn read_signup_form(mut multipart: Multipart) -> Result<(SignupRequest, Option<Vec<u8>>), AppError> {
    let mut form = SignupRequest::default();
    let mut picture = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            PICTURE_FIELD => {
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_PICTURE_BYTES {
                    return Err(AppError::invalid(format!(
                        "Profile picture too large. Maximum size is {}MB",
                        MAX_PICTURE_BYTES / 1024 / 1024
                    )));
                }
                if !bytes.is_empty() {
                    picture = Some(bytes.to_vec());
                }
            },
            "name" => form.name = Some(field.text().await?),
            "email" => form.email = Some(field.text().await?),
            "password" => form.password = Some(field.text().await?),
            _ => {},
        }
    }
    Ok((form, picture))
}

fn with_session_cookie<S: Storage>(
    state: &AppState<S>,
    status: StatusCode,
    token: &str,
    body: AuthResponse,
) -> Response {
    let cookie = create_auth_cookie(token, state.cookie_config());
    (status, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

/// `POST /api/signup`; JSON or multipart with an optional `profilePicture`
pub async fn signup<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    request: Request,
) -> Result<Response, AppError> {
    let (form, picture) = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state).await?;
        read_signup_form(multipart).await?
    } else {
        let ApiJson(form) = ApiJson::<SignupRequest>::from_request(request, &state).await?;
        (form, None)
    };

    let (Some(name), Some(email), Some(password)) =
        (present(form.name), present(form.email), present_raw(form.password))
    else {
        return Err(ValidationError::MissingFields("Name, email, and password are required").into());
    };
    validate_email(&email)?;

    let taken = state
        .storage
        .count::<User>(Filter::all().eq("email", email.as_str()))
        .await?;
    if taken > 0 {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.auth.hash_password(password).await?;
    let user = state
        .storage
        .insert(User {
            id: 0,
            name,
            email,
            password_hash,
            profile_picture: picture.map(|bytes| STANDARD.encode(bytes)),
            role: Role::default(),
            created_at: Utc::now(),
        })
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("Email already registered".to_string()),
            other => other,
        })?;

    let token = state.auth.issue_token(user.id, &user.email)?;
    counter!(SIGNUP).increment(1);
    tracing::info!(user_id = user.id, "user signed up");

    Ok(with_session_cookie(
        &state,
        StatusCode::CREATED,
        &token,
        AuthResponse {
            message: "Signup successful".to_string(),
            user: UserProfile::from(&user),
        },
    ))
}

/// `POST /api/login`
pub async fn login<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    ClientIp(ip): ClientIp,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    if !state.login_limiter.check(ip) {
        tracing::warn!(%ip, "login rejected while locked out");
        return Err(AppError::AuthRateLimited);
    }

    let (Some(email), Some(password)) = (present(body.email), present_raw(body.password)) else {
        return Err(ValidationError::MissingFields("Email and password are required").into());
    };

    let user = state
        .storage
        .list::<User>(Filter::all().eq("email", email.as_str()).limit(1))
        .await?
        .into_iter()
        .next();

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = state.auth.verify_password(stored_hash, password).await?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            state.login_limiter.record_failure(ip);
            counter!(LOGIN_FAILURE).increment(1);
            tracing::warn!(%ip, "failed login");
            return Err(AppError::InvalidCredentials);
        },
    };

    state.login_limiter.record_success(ip);
    let token = state.auth.issue_token(user.id, &user.email)?;
    counter!(LOGIN_SUCCESS).increment(1);
    tracing::info!(user_id = user.id, "user logged in");

    Ok(with_session_cookie(
        &state,
        StatusCode::OK,
        &token,
        AuthResponse {
            message: "Login successful".to_string(),
            user: UserProfile::from(&user),
        },
    ))
}

/// `GET /api/user`
pub async fn current_user<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    caller: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .storage
        .get::<User>(caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse {
        user: UserProfile::from(&user),
    }))
}

/// `POST /api/logout`
pub async fn logout<S: Storage>(State(state): State<Arc<AppState<S>>>) -> Response {
    let cookie = create_logout_cookie(state.cookie_config());
    (
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out successfully")),
    )
        .into_response()
}

/// `POST /api/forgot-password`; confirms the account exists, sends nothing
pub async fn forgot_password<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = present(body.email).ok_or(ValidationError::MissingFields("Email is required"))?;

    let known = state
        .storage
        .count::<User>(Filter::all().eq("email", email.as_str()))
        .await?;
    if known == 0 {
        return Err(AppError::NotFound("Email not found".to_string()));
    }

    tracing::info!("password reset requested");
    Ok(Json(MessageResponse::new("Password reset link sent to email")))
}

/// `GET /api/protected`; echoes the verified claims
pub async fn protected(caller: CurrentUser) -> Json<serde_json::Value> {
    Json(json!({
        "message": "This is a protected route",
        "user": caller.claims,
    }))
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
