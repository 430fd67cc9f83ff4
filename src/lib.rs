//! # Obscura (Studio Back Office API)
//!
//! `obscura` is the back-office API for a photography studio. It authenticates
//! two separate audiences and manages the small amount of state the public
//! site needs:
//!
//! - **Admins** log in with a username and password and receive a short-lived
//!   bearer token for the dashboard (gallery management, inquiries).
//! - **Gallery clients** unlock a single gallery with a shared password and
//!   receive a token scoped to that gallery only.
//!
//! ## Sessions
//!
//! Session tokens are stateless HMAC-SHA256 bearer tokens with independent
//! signing secrets per audience, so a leaked gallery secret cannot mint admin
//! sessions. Tokens are accepted from the `Authorization: Bearer` header or
//! the session cookie. There is no server-side revocation: logout discards
//! the client-held copy and a token stays valid until its expiry.
//!
//! ## Login throttling
//!
//! Failed logins are tracked per identity in the database. Five failures
//! within a fifteen-minute window lock the identity out for fifteen minutes,
//! even if the correct password is submitted in between. A successful login
//! clears the record.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
