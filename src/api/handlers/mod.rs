//! API handlers for the studio back office.
//!
//! Routes are grouped by concern: `auth` (admin and gallery sessions),
//! `galleries` (credential management), `inquiries` (contact form), plus
//! `health` and the undocumented root.

pub mod auth;
pub mod galleries;
pub mod health;
pub mod inquiries;
pub mod root;
