//! Admin authorization guard for back-office endpoints.

use axum::http::{HeaderMap, StatusCode};

use super::state::AuthState;
use super::utils::extract_session_token;

/// The verified admin behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AdminPrincipal {
    pub(crate) username: String,
}

/// Require a valid admin bearer token (or session cookie) on the request.
///
/// # Errors
/// Returns `401 Unauthorized` for missing, malformed, expired, forged, or
/// wrong-audience tokens; the caller cannot tell which.
pub(crate) fn require_admin(
    headers: &HeaderMap,
    auth_state: &AuthState,
) -> Result<AdminPrincipal, StatusCode> {
    let token = extract_session_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let claims = auth_state
        .admin_signer()
        .verify(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(AdminPrincipal {
        username: claims.sub,
    })
}
