//! Admin login, session check, and logout endpoints.
//!
//! Flow Overview (login):
//! 1) Validate input, then consult the login throttle; locked identities are
//!    rejected before any password hashing happens.
//! 2) Look up the account; unknown usernames get the same generic rejection
//!    as wrong passwords.
//! 3) Verify the password with Argon2; failure records a throttle strike.
//! 4) Success clears the throttle record and mints an admin bearer token.
//!
//! Security boundaries:
//! - Lockout is the only distinguishable failure (429 + retry hint).
//! - Tokens are stateless; logout only clears the client-held cookie.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{
    state::AuthState,
    storage::lookup_admin_account,
    throttle::ThrottleDecision,
    types::{AdminLoginRequest, AdminLoginResponse, AdminSessionResponse, LoginErrorResponse},
    utils::{extract_client_ip, extract_session_token, valid_username, verify_password},
};

/// Throttle identities are namespaced so an admin username and a gallery id
/// can never share a lockout row.
pub(super) const ADMIN_THROTTLE_PREFIX: &str = "admin:";

#[utoipa::path(
    post,
    path = "/v1/auth/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Authenticated; token issued", body = AdminLoginResponse),
        (status = 400, description = "Malformed input", body = String),
        (status = 401, description = "Invalid credentials", body = LoginErrorResponse),
        (status = 429, description = "Locked out after repeated failures", body = LoginErrorResponse),
        (status = 500, description = "Store failure")
    ),
    tag = "auth"
)]
pub async fn admin_login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<AdminLoginRequest>>,
) -> impl IntoResponse {
    let request: AdminLoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let username = request.username.trim().to_lowercase();
    if !valid_username(&username) || request.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Invalid username or password".to_string())
            .into_response();
    }

    let identity = format!("{ADMIN_THROTTLE_PREFIX}{username}");
    let client_ip = extract_client_ip(&headers);

    // Throttle first: locked identities skip credential verification entirely.
    match auth_state.throttle().check(&identity).await {
        Ok(ThrottleDecision::Allowed) => {}
        Ok(ThrottleDecision::Locked {
            retry_after_seconds,
        }) => {
            warn!(username = %username, ip = ?client_ip, "admin login rejected: locked out");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(LoginErrorResponse::locked_out(retry_after_seconds)),
            )
                .into_response();
        }
        Err(err) => {
            error!("Failed to check login throttle: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let account = match lookup_admin_account(&pool, &username).await {
        Ok(account) => account,
        Err(err) => {
            error!("Failed to lookup admin account: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Unknown username and wrong password share one code path and one answer.
    let verified = account
        .as_ref()
        .is_some_and(|account| verify_password(&request.password, &account.password_hash));

    if !verified {
        if let Err(err) = auth_state.throttle().record_failure(&identity).await {
            error!("Failed to record login failure: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        warn!(username = %username, ip = ?client_ip, "admin login failed");
        return (
            StatusCode::UNAUTHORIZED,
            Json(LoginErrorResponse::invalid_credentials()),
        )
            .into_response();
    }

    if let Err(err) = auth_state.throttle().clear(&identity).await {
        error!("Failed to clear login attempts: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let ttl = auth_state.config().admin_session_ttl_seconds();
    let (token, claims) = match auth_state.admin_signer().issue(&username, ttl) {
        Ok(issued) => issued,
        Err(err) => {
            error!("Failed to issue admin token: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    info!(username = %username, "admin login succeeded");

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = session_cookie(&auth_state, &token, ttl) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (
        StatusCode::OK,
        response_headers,
        Json(AdminLoginResponse {
            authenticated: true,
            username,
            token,
            expires_at: claims.exp,
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/v1/auth/admin/session",
    responses(
        (status = 200, description = "Session state for the presented token", body = AdminSessionResponse)
    ),
    tag = "auth"
)]
pub async fn admin_session(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    // Unauthenticated is a normal outcome here, never an error status.
    let response = match extract_session_token(&headers)
        .and_then(|token| auth_state.admin_signer().verify(&token).ok())
    {
        Some(claims) => AdminSessionResponse {
            authenticated: true,
            username: Some(claims.sub),
        },
        None => AdminSessionResponse {
            authenticated: false,
            username: None,
        },
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    post,
    path = "/v1/auth/admin/logout",
    responses(
        (status = 204, description = "Cookie cleared; client discards its token")
    ),
    tag = "auth"
)]
pub async fn admin_logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Tokens are stateless: there is nothing server-side to invalidate, so a
    // token issued before logout stays valid until its expiry.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(&auth_state) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers)
}

/// Build a secure `HttpOnly` cookie carrying the session token.
pub(super) fn session_cookie(
    auth_state: &AuthState,
    token: &str,
    ttl_seconds: i64,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let name = super::utils::SESSION_COOKIE_NAME;
    let mut cookie =
        format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}");
    if auth_state.config().session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn clear_session_cookie(
    auth_state: &AuthState,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let name = super::utils::SESSION_COOKIE_NAME;
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if auth_state.config().session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
