use crate::api;
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_base_url: String,
    pub admin_token_secret: SecretString,
    pub gallery_token_secret: SecretString,
    pub admin_session_ttl_seconds: i64,
    pub gallery_session_ttl_seconds: i64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the signing secrets are rejected or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = api::handlers::auth::AuthConfig::new(args.frontend_base_url)
        .with_admin_session_ttl_seconds(args.admin_session_ttl_seconds)
        .with_gallery_session_ttl_seconds(args.gallery_session_ttl_seconds);

    api::new(
        args.port,
        args.dsn,
        auth_config,
        &args.admin_token_secret,
        &args.gallery_token_secret,
    )
    .await
}
