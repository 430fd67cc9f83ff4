//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::sessions;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let session_opts = sessions::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        frontend_base_url: session_opts.frontend_base_url,
        admin_token_secret: session_opts.admin_token_secret,
        gallery_token_secret: session_opts.gallery_token_secret,
        admin_session_ttl_seconds: session_opts.admin_session_ttl_seconds,
        gallery_session_ttl_seconds: session_opts.gallery_session_ttl_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::actions::Action;

    #[test]
    fn server_action_from_env() {
        temp_env::with_vars(
            [
                ("OBSCURA_PORT", Some("9090")),
                (
                    "OBSCURA_DSN",
                    Some("postgres://user@localhost:5432/obscura"),
                ),
                (
                    "OBSCURA_ADMIN_TOKEN_SECRET",
                    Some("0123456789abcdef0123456789abcdef"),
                ),
                (
                    "OBSCURA_GALLERY_TOKEN_SECRET",
                    Some("fedcba9876543210fedcba9876543210"),
                ),
                ("OBSCURA_FRONTEND_BASE_URL", Some("http://localhost:5173")),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["obscura"]);
                let action = handler(&matches);
                assert!(action.is_ok());
                if let Ok(Action::Server(args)) = action {
                    assert_eq!(args.port, 9090);
                    assert_eq!(args.dsn, "postgres://user@localhost:5432/obscura");
                    assert_eq!(args.frontend_base_url, "http://localhost:5173");
                    assert_eq!(args.admin_session_ttl_seconds, 43200);
                    assert_eq!(args.gallery_session_ttl_seconds, 86400);
                }
            },
        );
    }
}
