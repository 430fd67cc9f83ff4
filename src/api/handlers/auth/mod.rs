//! Auth handlers and supporting modules.
//!
//! Two audiences are authenticated here, structurally in parallel:
//!
//! - **Admin** — username + password, 12-hour sessions for the dashboard.
//! - **Gallery client** — gallery id + shared password, 24-hour sessions
//!   scoped to a single gallery.
//!
//! ## Login throttling
//!
//! Failed attempts are tracked per identity (namespaced `admin:` /
//! `gallery:`) in the `login_attempts` table. Five failures within fifteen
//! minutes lock the identity out for fifteen minutes; correct credentials do
//! not bypass an active lockout. A successful login clears the record.
//!
//! ## Tokens
//!
//! Sessions are stateless HMAC-SHA256 bearer tokens with independent signing
//! secrets and audiences per side, so neither token kind is accepted by the
//! other's endpoints. Logout only discards the client copy.

pub(crate) mod admin;
pub(crate) mod gallery;
pub(crate) mod guard;
mod state;
mod storage;
mod throttle;
pub(crate) mod token;
pub(crate) mod types;
mod utils;

pub use state::{AuthConfig, AuthState};
pub use token::MIN_SECRET_LENGTH;

pub(crate) use utils::{hash_password, valid_gallery_id};
