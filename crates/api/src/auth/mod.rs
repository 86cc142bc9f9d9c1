//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation. Tokens are issued elsewhere
//!   and signed with the shared `JWT_SECRET`.

pub mod jwt;
