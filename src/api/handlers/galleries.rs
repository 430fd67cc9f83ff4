//! Admin-guarded gallery credential management.
//!
//! The admin dashboard configures which client galleries exist and what
//! password unlocks each one. Passwords are hashed with Argon2id before the
//! row is written; the raw value is never stored or logged.

use axum::{
    Json,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{Instrument, error, info};
use utoipa::ToSchema;

use super::auth::{AuthState, guard::require_admin, hash_password, valid_gallery_id};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GallerySummary {
    pub gallery_id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UpsertGalleryRequest {
    pub title: String,
    pub password: String,
}

const MIN_GALLERY_PASSWORD_LENGTH: usize = 8;

#[utoipa::path(
    get,
    path = "/v1/admin/galleries",
    responses(
        (status = 200, description = "Configured galleries, most recently updated first", body = [GallerySummary]),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Store failure")
    ),
    tag = "galleries"
)]
pub async fn list_galleries(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    if let Err(status) = require_admin(&headers, &auth_state) {
        return status.into_response();
    }

    let query = r"
        SELECT gallery_id, title, updated_at
        FROM gallery_credentials
        ORDER BY updated_at DESC
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
            error!("Failed to list galleries: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let galleries: Vec<GallerySummary> = rows
        .into_iter()
        .map(|row| GallerySummary {
            gallery_id: row.get("gallery_id"),
            title: row.get("title"),
            updated_at: row.get("updated_at"),
        })
        .collect();

    (StatusCode::OK, Json(galleries)).into_response()
}

#[utoipa::path(
    put,
    path = "/v1/admin/galleries/{gallery_id}",
    request_body = UpsertGalleryRequest,
    params(
        ("gallery_id" = String, Path, description = "Gallery slug, e.g. wedding-42")
    ),
    responses(
        (status = 204, description = "Gallery credential created or updated"),
        (status = 400, description = "Invalid slug, title, or password", body = String),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Store failure")
    ),
    tag = "galleries"
)]
pub async fn upsert_gallery(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Path(gallery_id): Path<String>,
    payload: Option<Json<UpsertGalleryRequest>>,
) -> impl IntoResponse {
    let admin = match require_admin(&headers, &auth_state) {
        Ok(admin) => admin,
        Err(status) => return status.into_response(),
    };

    let request: UpsertGalleryRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let gallery_id = gallery_id.trim().to_lowercase();
    if !valid_gallery_id(&gallery_id) {
        return (StatusCode::BAD_REQUEST, "Invalid gallery id".to_string()).into_response();
    }
    let title = request.title.trim();
    if title.is_empty() || title.len() > 200 {
        return (StatusCode::BAD_REQUEST, "Invalid title".to_string()).into_response();
    }
    if request.password.len() < MIN_GALLERY_PASSWORD_LENGTH {
        return (
            StatusCode::BAD_REQUEST,
            format!("Password must be at least {MIN_GALLERY_PASSWORD_LENGTH} characters"),
        )
            .into_response();
    }

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash gallery password: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let query = r"
        INSERT INTO gallery_credentials (gallery_id, password_hash, title)
        VALUES ($1, $2, $3)
        ON CONFLICT (gallery_id) DO UPDATE
        SET password_hash = EXCLUDED.password_hash,
            title = EXCLUDED.title,
            updated_at = NOW()
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    if let Err(err) = sqlx::query(query)
        .bind(&gallery_id)
        .bind(&password_hash)
        .bind(title)
        .execute(&pool.0)
        .instrument(span)
        .await
    {
        error!("Failed to upsert gallery credential: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    info!(gallery_id = %gallery_id, admin = %admin.username, "gallery credential updated");
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::Utc;

    #[test]
    fn gallery_summary_round_trips() -> Result<()> {
        let summary = GallerySummary {
            gallery_id: "wedding-42".to_string(),
            title: "Bloom Wedding".to_string(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&summary)?;
        let decoded: GallerySummary = serde_json::from_value(value)?;
        assert_eq!(decoded.gallery_id, "wedding-42");
        assert_eq!(decoded.title, "Bloom Wedding");
        Ok(())
    }
}
