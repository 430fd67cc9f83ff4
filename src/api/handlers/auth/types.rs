//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminLoginResponse {
    pub authenticated: bool,
    pub username: String,
    pub token: String,
    /// Token expiry (unix seconds).
    pub expires_at: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminSessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GalleryLoginRequest {
    pub gallery_id: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GalleryLoginResponse {
    pub authenticated: bool,
    pub gallery_id: String,
    pub gallery_title: String,
    pub token: String,
    /// Token expiry (unix seconds).
    pub expires_at: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GallerySessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_id: Option<String>,
}

/// Generic failure body; the message never distinguishes unknown identities
/// from wrong passwords. `retry_after_seconds` is set only for lockouts.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<i64>,
}

impl LoginErrorResponse {
    pub(super) fn invalid_credentials() -> Self {
        Self {
            error: "Invalid credentials".to_string(),
            retry_after_seconds: None,
        }
    }

    pub(super) fn locked_out(retry_after_seconds: i64) -> Self {
        Self {
            error: "Too many failed attempts".to_string(),
            retry_after_seconds: Some(retry_after_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn admin_login_request_round_trips() -> Result<()> {
        let request = AdminLoginRequest {
            username: "studio".to_string(),
            password: "Correct1!".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let username = value
            .get("username")
            .and_then(serde_json::Value::as_str)
            .context("missing username")?;
        assert_eq!(username, "studio");
        let decoded: AdminLoginRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.password, "Correct1!");
        Ok(())
    }

    #[test]
    fn session_response_omits_absent_subject() -> Result<()> {
        let response = AdminSessionResponse {
            authenticated: false,
            username: None,
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("username").is_none());
        Ok(())
    }

    #[test]
    fn locked_out_response_carries_retry_hint() -> Result<()> {
        let response = LoginErrorResponse::locked_out(240);
        let value = serde_json::to_value(&response)?;
        assert_eq!(
            value
                .get("retry_after_seconds")
                .and_then(serde_json::Value::as_i64),
            Some(240)
        );

        let value = serde_json::to_value(LoginErrorResponse::invalid_credentials())?;
        assert!(value.get("retry_after_seconds").is_none());
        Ok(())
    }
}
