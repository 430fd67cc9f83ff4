//! Contact inquiries: public intake plus admin-guarded listing.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{Instrument, error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{AuthState, guard::require_admin};

const MAX_MESSAGE_LENGTH: usize = 4000;
const MAX_NAME_LENGTH: usize = 120;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct InquiryRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[utoipa::path(
    post,
    path = "/v1/inquiries",
    request_body = InquiryRequest,
    responses(
        (status = 201, description = "Inquiry recorded"),
        (status = 400, description = "Invalid name, email, or message", body = String),
        (status = 500, description = "Store failure")
    ),
    tag = "inquiries"
)]
pub async fn submit_inquiry(
    pool: Extension<PgPool>,
    payload: Option<Json<InquiryRequest>>,
) -> impl IntoResponse {
    let request: InquiryRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let name = request.name.trim();
    let email = request.email.trim().to_lowercase();
    let message = request.message.trim();

    if name.is_empty() || name.len() > MAX_NAME_LENGTH {
        return (StatusCode::BAD_REQUEST, "Invalid name".to_string()).into_response();
    }
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }
    if message.is_empty() || message.len() > MAX_MESSAGE_LENGTH {
        return (StatusCode::BAD_REQUEST, "Invalid message".to_string()).into_response();
    }

    let query = r"
        INSERT INTO inquiries (name, email, message)
        VALUES ($1, $2, $3)
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    if let Err(err) = sqlx::query(query)
        .bind(name)
        .bind(&email)
        .bind(message)
        .execute(&pool.0)
        .instrument(span)
        .await
    {
        error!("Failed to insert inquiry: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    info!("inquiry recorded");
    StatusCode::CREATED.into_response()
}

#[utoipa::path(
    get,
    path = "/v1/admin/inquiries",
    responses(
        (status = 200, description = "Inquiries, newest first", body = [Inquiry]),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Store failure")
    ),
    tag = "inquiries"
)]
pub async fn list_inquiries(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    if let Err(status) = require_admin(&headers, &auth_state) {
        return status.into_response();
    }

    let query = r"
        SELECT id, name, email, message, created_at
        FROM inquiries
        ORDER BY created_at DESC
        LIMIT 200
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = match sqlx::query(query).fetch_all(&pool.0).instrument(span).await {
        Ok(rows) => rows,
        Err(err) => {
            error!("Failed to list inquiries: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let inquiries: Vec<Inquiry> = rows
        .into_iter()
        .map(|row| Inquiry {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            message: row.get("message"),
            created_at: row.get("created_at"),
        })
        .collect();

    (StatusCode::OK, Json(inquiries)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("client@example.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn inquiry_request_round_trips() -> anyhow::Result<()> {
        let request = InquiryRequest {
            name: "June".to_string(),
            email: "june@example.com".to_string(),
            message: "Do you shoot elopements?".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let decoded: InquiryRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.email, "june@example.com");
        Ok(())
    }
}
