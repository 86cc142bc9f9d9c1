//! Domain logic for the GymDesk membership service.
//!
//! This crate has no database dependencies. Everything here is either a
//! pure function over pre-loaded data or, for check-in, works against the
//! [`check_in::MemberStore`] capability supplied by the caller.

pub mod check_in;
pub mod entitlement;
pub mod error;
pub mod member;
pub mod phone;
pub mod statistics;
pub mod ticket;
pub mod types;
