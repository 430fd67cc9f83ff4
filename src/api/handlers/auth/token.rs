//! Stateless HMAC-SHA256 session tokens.
//!
//! Flow Overview:
//! 1) Serialize claims (audience, subject, iat, exp) as JSON.
//! 2) Sign `base64url(payload)` with a per-audience secret.
//! 3) Token is `base64url(payload).base64url(signature)`.
//!
//! Security boundaries:
//! - Admin and gallery tokens use independent secrets; the audience claim is
//!   also checked on verify, so neither namespace accepts the other's tokens.
//! - Signature comparison is constant-time.
//! - Verification failures are collapsed into `TokenError`; callers report a
//!   single unauthenticated outcome without leaking the rejection reason.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

type HmacSha256 = Hmac<Sha256>;

/// Secrets shorter than this are rejected at startup.
pub const MIN_SECRET_LENGTH: usize = 32;
/// Upper bound on accepted token length, to reject garbage early.
const MAX_TOKEN_LENGTH: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signing secret must be at least {MIN_SECRET_LENGTH} bytes, got {0}")]
    SecretTooShort(usize),
    #[error("Token TTL must be positive")]
    InvalidTtl,
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
    #[error("Audience mismatch")]
    AudienceMismatch,
    #[error("Failed to encode claims: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Token audience: which side of the house a session belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Admin,
    Gallery,
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub aud: Audience,
    /// Admin username or gallery id, depending on the audience.
    pub sub: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

impl Claims {
    /// Seconds until expiry, clamped at zero.
    #[must_use]
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        (self.exp - now).max(0)
    }
}

/// Mints and verifies tokens for a single audience.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    audience: Audience,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"***")
            .field("audience", &self.audience)
            .finish()
    }
}

impl TokenSigner {
    /// Build a signer for one audience.
    ///
    /// # Errors
    /// Returns `TokenError::SecretTooShort` for secrets under 32 bytes.
    pub fn new(secret: &[u8], audience: Audience) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(TokenError::SecretTooShort(secret.len()));
        }
        Ok(Self {
            secret: secret.to_vec(),
            audience,
        })
    }

    /// Issue a token for `subject`, valid for `ttl_seconds` from now.
    ///
    /// # Errors
    /// Returns an error if the TTL is non-positive or claims fail to encode.
    pub fn issue(&self, subject: &str, ttl_seconds: i64) -> Result<(String, Claims), TokenError> {
        if ttl_seconds <= 0 {
            return Err(TokenError::InvalidTtl);
        }
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            aud: self.audience,
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl_seconds,
        };
        let payload = serde_json::to_vec(&claims)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signature = self.compute_signature(&payload_b64);
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);
        Ok((format!("{payload_b64}.{signature_b64}"), claims))
    }

    /// Verify a token and return its claims.
    ///
    /// Accepts only if the signature matches this signer's secret, the
    /// audience matches, and the expiry is still in the future.
    ///
    /// # Errors
    /// Returns a `TokenError` variant on any decode, signature, audience, or
    /// expiry failure. Callers should not surface which one.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(TokenError::Malformed);
        }
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        if signature_b64.contains('.') {
            return Err(TokenError::Malformed);
        }

        // Signature first, before trusting any byte of the payload.
        let provided = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;
        let expected = self.compute_signature(payload_b64);
        if !bool::from(provided.ct_eq(&expected)) {
            return Err(TokenError::InvalidSignature);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&payload)?;

        if claims.aud != self.audience {
            return Err(TokenError::AudienceMismatch);
        }
        if chrono::Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn compute_signature(&self, payload_b64: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any size");
        mac.update(payload_b64.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    const ADMIN_SECRET: &[u8; 32] = b"admin-secret-0123456789abcdefghi";
    const GALLERY_SECRET: &[u8; 32] = b"gallery-secret-0123456789abcdefg";

    #[test]
    fn issue_then_verify_round_trips_subject() {
        let signer = TokenSigner::new(ADMIN_SECRET, Audience::Admin).unwrap();
        let (token, issued) = signer.issue("studio", 3600).unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "studio");
        assert_eq!(claims.aud, Audience::Admin);
        assert_eq!(claims.exp, issued.exp);
        assert!(claims.remaining_seconds(chrono::Utc::now().timestamp()) > 0);
    }

    #[test]
    fn rejects_short_secret() {
        assert!(matches!(
            TokenSigner::new(b"short", Audience::Admin),
            Err(TokenError::SecretTooShort(5))
        ));
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let signer = TokenSigner::new(ADMIN_SECRET, Audience::Admin).unwrap();
        assert!(matches!(signer.issue("studio", 0), Err(TokenError::InvalidTtl)));
        assert!(matches!(signer.issue("studio", -5), Err(TokenError::InvalidTtl)));
    }

    #[test]
    fn rejects_expired_even_with_valid_signature() {
        let signer = TokenSigner::new(ADMIN_SECRET, Audience::Admin).unwrap();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            aud: Audience::Admin,
            sub: "studio".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let signature_b64 = URL_SAFE_NO_PAD.encode(signer.compute_signature(&payload_b64));
        let token = format!("{payload_b64}.{signature_b64}");
        assert!(matches!(signer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn rejects_tampered_payload() {
        let signer = TokenSigner::new(ADMIN_SECRET, Audience::Admin).unwrap();
        let (token, _) = signer.issue("studio", 3600).unwrap();
        let (_, signature_b64) = token.split_once('.').unwrap();
        let forged_claims = Claims {
            aud: Audience::Admin,
            sub: "intruder".to_string(),
            iat: 0,
            exp: i64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{forged_payload}.{signature_b64}");
        assert!(matches!(
            signer.verify(&forged),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let admin = TokenSigner::new(ADMIN_SECRET, Audience::Admin).unwrap();
        let other = TokenSigner::new(GALLERY_SECRET, Audience::Admin).unwrap();
        let (token, _) = other.issue("studio", 3600).unwrap();
        assert!(matches!(
            admin.verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn gallery_token_rejected_by_admin_audience_and_vice_versa() {
        let admin = TokenSigner::new(ADMIN_SECRET, Audience::Admin).unwrap();
        let gallery = TokenSigner::new(GALLERY_SECRET, Audience::Gallery).unwrap();

        let (gallery_token, _) = gallery.issue("wedding-42", 3600).unwrap();
        // Wrong secret dominates; either way the token is refused.
        assert!(admin.verify(&gallery_token).is_err());

        // Same secret, different audience: the aud claim alone must reject.
        let admin_as_gallery = TokenSigner::new(ADMIN_SECRET, Audience::Gallery).unwrap();
        let (admin_token, _) = admin.issue("studio", 3600).unwrap();
        assert!(matches!(
            admin_as_gallery.verify(&admin_token),
            Err(TokenError::AudienceMismatch)
        ));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let signer = TokenSigner::new(ADMIN_SECRET, Audience::Admin).unwrap();
        assert!(matches!(signer.verify(""), Err(TokenError::Malformed)));
        assert!(matches!(
            signer.verify("no-separator"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(signer.verify("a.b.c"), Err(TokenError::Malformed)));
        assert!(matches!(
            signer.verify("!!!.???"),
            Err(TokenError::Malformed)
        ));
        let oversized = "a".repeat(MAX_TOKEN_LENGTH + 1);
        assert!(matches!(
            signer.verify(&oversized),
            Err(TokenError::Malformed)
        ));
    }
}
