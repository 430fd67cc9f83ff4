//! Small helpers for auth input validation, password hashing, and token
//! extraction from request headers.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::http::{HeaderMap, header::AUTHORIZATION};
use regex::Regex;

pub(super) const SESSION_COOKIE_NAME: &str = "obscura_session";

/// Hash a password with Argon2id for storage.
///
/// # Errors
/// Returns an error string if hashing fails (never expected with OsRng).
pub(crate) fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| format!("failed to hash password: {err}"))
}

/// Verify a supplied password against a stored Argon2 hash.
///
/// Argon2's verifier compares digests in constant time; an unparsable stored
/// hash counts as a mismatch rather than an error so the response stays
/// indistinguishable from a wrong password.
pub(super) fn verify_password(supplied: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(supplied.as_bytes(), &parsed)
        .is_ok()
}

/// Admin usernames: lowercase alphanumeric with dots/dashes/underscores.
pub(super) fn valid_username(username: &str) -> bool {
    Regex::new(r"^[a-z0-9][a-z0-9._-]{0,63}$").is_ok_and(|re| re.is_match(username))
}

/// Gallery ids are URL slugs, e.g. "wedding-42".
pub(crate) fn valid_gallery_id(gallery_id: &str) -> bool {
    Regex::new(r"^[a-z0-9][a-z0-9-]{0,63}$").is_ok_and(|re| re.is_match(gallery_id))
}

/// Pull a session token from the `Authorization` header or the session cookie.
pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Extract a client IP for logging from common proxy headers.
pub(super) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn hash_then_verify_accepts_correct_password() {
        let hash = hash_password("Correct1!").unwrap();
        assert!(verify_password("Correct1!", &hash));
        assert!(!verify_password("Wrong", &hash));
    }

    #[test]
    fn verify_password_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn valid_username_accepts_slug_like_names() {
        assert!(valid_username("studio"));
        assert!(valid_username("jane.doe-2"));
        assert!(!valid_username(""));
        assert!(!valid_username("Has Spaces"));
        assert!(!valid_username("UPPER"));
    }

    #[test]
    fn valid_gallery_id_accepts_slugs_only() {
        assert!(valid_gallery_id("wedding-42"));
        assert!(!valid_gallery_id("-leading-dash"));
        assert!(!valid_gallery_id("nope_underscore"));
    }

    #[test]
    fn extract_session_token_prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("obscura_session=fromcookie"),
        );
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_session_token_falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; obscura_session=tok; lang=en"),
        );
        assert_eq!(extract_session_token(&headers), Some("tok".to_string()));
    }

    #[test]
    fn extract_session_token_none_when_missing() {
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn extract_client_ip_prefers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(extract_client_ip(&headers), Some("9.9.9.9".to_string()));
    }
}
