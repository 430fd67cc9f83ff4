//! Database access for admin and gallery credentials.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

/// Stored admin account. Provisioned out of band; never written here.
pub(super) struct AdminAccount {
    pub(super) username: String,
    pub(super) password_hash: String,
}

/// Stored credential for one client gallery.
pub(super) struct GalleryCredential {
    pub(super) gallery_id: String,
    pub(super) password_hash: String,
    pub(super) title: String,
}

/// Look up an admin account by username.
///
/// Returns `Ok(None)` for unknown usernames; callers must respond the same
/// way as for a wrong password.
pub(super) async fn lookup_admin_account(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AdminAccount>> {
    let query = "SELECT username, password_hash FROM admin_accounts WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup admin account")?;

    Ok(row.map(|row| AdminAccount {
        username: row.get("username"),
        password_hash: row.get("password_hash"),
    }))
}

/// Look up a gallery credential by gallery id.
pub(super) async fn lookup_gallery_credential(
    pool: &PgPool,
    gallery_id: &str,
) -> Result<Option<GalleryCredential>> {
    let query = r"
        SELECT gallery_id, password_hash, title
        FROM gallery_credentials
        WHERE gallery_id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(gallery_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup gallery credential")?;

    Ok(row.map(|row| GalleryCredential {
        gallery_id: row.get("gallery_id"),
        password_hash: row.get("password_hash"),
        title: row.get("title"),
    }))
}

#[cfg(test)]
mod tests {
    use super::{AdminAccount, GalleryCredential};

    #[test]
    fn admin_account_holds_values() {
        let account = AdminAccount {
            username: "studio".to_string(),
            password_hash: "$argon2id$...".to_string(),
        };
        assert_eq!(account.username, "studio");
        assert!(account.password_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn gallery_credential_holds_values() {
        let credential = GalleryCredential {
            gallery_id: "wedding-42".to_string(),
            password_hash: "$argon2id$...".to_string(),
            title: "Bloom Wedding".to_string(),
        };
        assert_eq!(credential.gallery_id, "wedding-42");
        assert_eq!(credential.title, "Bloom Wedding");
    }
}
