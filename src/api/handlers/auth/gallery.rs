//! Client gallery login and session check endpoints.
//!
//! Structurally parallel to the admin flow: throttle check, credential
//! lookup, Argon2 verification, then a gallery-scoped token. Gallery tokens
//! are signed with their own secret and carry the gallery audience, so they
//! are useless against admin endpoints.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{
    admin::session_cookie,
    state::AuthState,
    storage::lookup_gallery_credential,
    throttle::ThrottleDecision,
    types::{
        GalleryLoginRequest, GalleryLoginResponse, GallerySessionResponse, LoginErrorResponse,
    },
    utils::{extract_client_ip, extract_session_token, valid_gallery_id, verify_password},
};

pub(super) const GALLERY_THROTTLE_PREFIX: &str = "gallery:";

#[utoipa::path(
    post,
    path = "/v1/auth/gallery/login",
    request_body = GalleryLoginRequest,
    responses(
        (status = 200, description = "Gallery unlocked; token issued", body = GalleryLoginResponse),
        (status = 400, description = "Malformed input", body = String),
        (status = 401, description = "Invalid credentials", body = LoginErrorResponse),
        (status = 429, description = "Locked out after repeated failures", body = LoginErrorResponse),
        (status = 500, description = "Store failure")
    ),
    tag = "auth"
)]
pub async fn gallery_login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<GalleryLoginRequest>>,
) -> impl IntoResponse {
    let request: GalleryLoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let gallery_id = request.gallery_id.trim().to_lowercase();
    if !valid_gallery_id(&gallery_id) || request.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "Invalid gallery id or password".to_string(),
        )
            .into_response();
    }

    let identity = format!("{GALLERY_THROTTLE_PREFIX}{gallery_id}");
    let client_ip = extract_client_ip(&headers);

    match auth_state.throttle().check(&identity).await {
        Ok(ThrottleDecision::Allowed) => {}
        Ok(ThrottleDecision::Locked {
            retry_after_seconds,
        }) => {
            warn!(gallery_id = %gallery_id, ip = ?client_ip, "gallery login rejected: locked out");
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

    let credential = match lookup_gallery_credential(&pool, &gallery_id).await {
        Ok(credential) => credential,
        Err(err) => {
            error!("Failed to lookup gallery credential: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let verified = credential
        .as_ref()
        .is_some_and(|credential| verify_password(&request.password, &credential.password_hash));

    if !verified {
        if let Err(err) = auth_state.throttle().record_failure(&identity).await {
            error!("Failed to record login failure: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        warn!(gallery_id = %gallery_id, ip = ?client_ip, "gallery login failed");
        return (
            StatusCode::UNAUTHORIZED,
            Json(LoginErrorResponse::invalid_credentials()),
        )
            .into_response();
    }

    // `verified` implies the credential row exists.
    let Some(credential) = credential else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    if let Err(err) = auth_state.throttle().clear(&identity).await {
        error!("Failed to clear login attempts: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let ttl = auth_state.config().gallery_session_ttl_seconds();
    let (token, claims) = match auth_state.gallery_signer().issue(&gallery_id, ttl) {
        Ok(issued) => issued,
        Err(err) => {
            error!("Failed to issue gallery token: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    info!(gallery_id = %gallery_id, "gallery login succeeded");

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = session_cookie(&auth_state, &token, ttl) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (
        StatusCode::OK,
        response_headers,
        Json(GalleryLoginResponse {
            authenticated: true,
            gallery_id: credential.gallery_id,
            gallery_title: credential.title,
            token,
            expires_at: claims.exp,
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/v1/auth/gallery/session",
    responses(
        (status = 200, description = "Session state for the presented token", body = GallerySessionResponse)
    ),
    tag = "auth"
)]
pub async fn gallery_session(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    // Expired, forged, or admin-audience tokens all land in the same bucket.
    let response = match extract_session_token(&headers)
        .and_then(|token| auth_state.gallery_signer().verify(&token).ok())
    {
        Some(claims) => GallerySessionResponse {
            authenticated: true,
            gallery_id: Some(claims.sub),
        },
        None => GallerySessionResponse {
            authenticated: false,
            gallery_id: None,
        },
    };
    (StatusCode::OK, Json(response))
}
