use anyhow::{Context, Result};
use clap::{Arg, Command};
use secrecy::SecretString;

pub const ARG_ADMIN_TOKEN_SECRET: &str = "admin-token-secret";
pub const ARG_GALLERY_TOKEN_SECRET: &str = "gallery-token-secret";

pub fn with_args(command: Command) -> Command {
    let command = with_secret_args(command);
    with_ttl_args(command)
}

fn with_secret_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("frontend-base-url")
                .long("frontend-base-url")
                .help("Frontend base URL, used for the CORS allow-origin and cookie flags")
                .env("OBSCURA_FRONTEND_BASE_URL")
                .default_value("https://atelierobscura.dev"),
        )
        .arg(
            Arg::new(ARG_ADMIN_TOKEN_SECRET)
                .long(ARG_ADMIN_TOKEN_SECRET)
                .help("HMAC secret for admin session tokens (min 32 bytes)")
                .env("OBSCURA_ADMIN_TOKEN_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_GALLERY_TOKEN_SECRET)
                .long(ARG_GALLERY_TOKEN_SECRET)
                .help("HMAC secret for gallery session tokens (min 32 bytes)")
                .env("OBSCURA_GALLERY_TOKEN_SECRET")
                .hide_env_values(true)
                .required(true),
        )
}

fn with_ttl_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("admin-session-ttl-seconds")
                .long("admin-session-ttl-seconds")
                .help("Admin session token TTL in seconds")
                .env("OBSCURA_ADMIN_SESSION_TTL_SECONDS")
                .default_value("43200")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("gallery-session-ttl-seconds")
                .long("gallery-session-ttl-seconds")
                .help("Gallery session token TTL in seconds")
                .env("OBSCURA_GALLERY_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub frontend_base_url: String,
    pub admin_token_secret: SecretString,
    pub gallery_token_secret: SecretString,
    pub admin_session_ttl_seconds: i64,
    pub gallery_session_ttl_seconds: i64,
}

impl Options {
    /// Extract session options from parsed matches.
    ///
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let frontend_base_url = matches
            .get_one::<String>("frontend-base-url")
            .cloned()
            .context("missing required argument: --frontend-base-url")?;
        let admin_token_secret = matches
            .get_one::<String>(ARG_ADMIN_TOKEN_SECRET)
            .cloned()
            .map(SecretString::from)
            .with_context(|| format!("missing required argument: --{ARG_ADMIN_TOKEN_SECRET}"))?;
        let gallery_token_secret = matches
            .get_one::<String>(ARG_GALLERY_TOKEN_SECRET)
            .cloned()
            .map(SecretString::from)
            .with_context(|| format!("missing required argument: --{ARG_GALLERY_TOKEN_SECRET}"))?;
        let admin_session_ttl_seconds = matches
            .get_one::<i64>("admin-session-ttl-seconds")
            .copied()
            .unwrap_or(43200);
        let gallery_session_ttl_seconds = matches
            .get_one::<i64>("gallery-session-ttl-seconds")
            .copied()
            .unwrap_or(86400);

        Ok(Self {
            frontend_base_url,
            admin_token_secret,
            gallery_token_secret,
            admin_session_ttl_seconds,
            gallery_session_ttl_seconds,
        })
    }
}
