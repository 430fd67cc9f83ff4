//! Auth configuration and shared state.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use super::throttle::LoginThrottle;
use super::token::{Audience, TokenError, TokenSigner};

const DEFAULT_ADMIN_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;
const DEFAULT_GALLERY_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    admin_session_ttl_seconds: i64,
    gallery_session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            admin_session_ttl_seconds: DEFAULT_ADMIN_SESSION_TTL_SECONDS,
            gallery_session_ttl_seconds: DEFAULT_GALLERY_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_admin_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.admin_session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_gallery_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.gallery_session_ttl_seconds = seconds;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(super) fn admin_session_ttl_seconds(&self) -> i64 {
        self.admin_session_ttl_seconds
    }

    pub(super) fn gallery_session_ttl_seconds(&self) -> i64 {
        self.gallery_session_ttl_seconds
    }

    /// Only mark cookies Secure when the frontend is served over HTTPS.
    pub(super) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

/// Shared auth state: configuration, one signer per audience, and the
/// database-backed login throttle.
///
/// Secrets are loaded once at process start and validated for minimum length
/// by `TokenSigner::new`; the state is immutable afterwards.
#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    admin_signer: TokenSigner,
    gallery_signer: TokenSigner,
    throttle: LoginThrottle,
}

impl AuthState {
    /// Build auth state from configuration and the two signing secrets.
    ///
    /// # Errors
    /// Returns an error if either secret is under the minimum length.
    pub fn new(
        config: AuthConfig,
        pool: PgPool,
        admin_secret: &SecretString,
        gallery_secret: &SecretString,
    ) -> Result<Self, TokenError> {
        let admin_signer = TokenSigner::new(admin_secret.expose_secret().as_bytes(), Audience::Admin)?;
        let gallery_signer =
            TokenSigner::new(gallery_secret.expose_secret().as_bytes(), Audience::Gallery)?;
        Ok(Self {
            config,
            admin_signer,
            gallery_signer,
            throttle: LoginThrottle::new(pool),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn admin_signer(&self) -> &TokenSigner {
        &self.admin_signer
    }

    pub(super) fn gallery_signer(&self) -> &TokenSigner {
        &self.gallery_signer
    }

    pub(super) fn throttle(&self) -> &LoginThrottle {
        &self.throttle
    }
}

#[cfg(test)]
mod tests {
    use super::AuthConfig;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("https://atelierobscura.dev".to_string());
        assert_eq!(config.frontend_base_url(), "https://atelierobscura.dev");
        assert_eq!(
            config.admin_session_ttl_seconds(),
            super::DEFAULT_ADMIN_SESSION_TTL_SECONDS
        );
        assert_eq!(
            config.gallery_session_ttl_seconds(),
            super::DEFAULT_GALLERY_SESSION_TTL_SECONDS
        );
        assert!(config.session_cookie_secure());

        let config = config
            .with_admin_session_ttl_seconds(600)
            .with_gallery_session_ttl_seconds(1200);
        assert_eq!(config.admin_session_ttl_seconds(), 600);
        assert_eq!(config.gallery_session_ttl_seconds(), 1200);
    }

    #[test]
    fn cookie_not_secure_over_http() {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        assert!(!config.session_cookie_secure());
    }
}
