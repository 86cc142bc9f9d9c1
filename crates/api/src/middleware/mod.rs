//! Request extractors shared by protected routes.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated staff account from a JWT Bearer token.

pub mod auth;
