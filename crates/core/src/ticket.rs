//! Ticket catalog invariants and assignment arithmetic.
//!
//! A catalog entry ("plan") bounds usage by count, by time, or both. When
//! a plan is assigned to a member the plan's bounds are copied onto the
//! member as a concrete window and balance.

use chrono::Days;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Date;

/// Maximum length of a ticket type name.
pub const MAX_TICKET_TYPE_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Plan kind
// ---------------------------------------------------------------------------

/// How a ticket bounds usage. Mirrors the dashboard's `membershipType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    /// Time-bounded only.
    Period,
    /// Count-bounded (with or without a validity window).
    Count,
    /// Neither bound set.
    Custom,
}

impl MembershipType {
    /// Classify a member's ticket snapshot.
    pub fn classify(end_date: Option<Date>, remain_count: Option<i32>) -> Self {
        match (end_date, remain_count) {
            (_, Some(_)) => Self::Count,
            (Some(_), None) => Self::Period,
            (None, None) => Self::Custom,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a ticket type name: non-empty and within the length limit.
pub fn validate_ticket_type(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Ticket type must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_TICKET_TYPE_LEN {
        return Err(CoreError::Validation(format!(
            "Ticket type too long: {} chars (max {MAX_TICKET_TYPE_LEN})",
            name.chars().count()
        )));
    }
    Ok(())
}

/// Validate the usage bounds and price of a plan.
///
/// At least one of `count` / `duration_days` must be set, and whichever
/// are set must be positive.
pub fn validate_plan(
    count: Option<i32>,
    duration_days: Option<i32>,
    price: i64,
) -> Result<(), CoreError> {
    if count.is_none() && duration_days.is_none() {
        return Err(CoreError::Validation(
            "A ticket must set at least one of count or duration_days".to_string(),
        ));
    }
    if let Some(c) = count {
        if c <= 0 {
            return Err(CoreError::Validation(format!(
                "count must be positive, got {c}"
            )));
        }
    }
    if let Some(d) = duration_days {
        if d <= 0 {
            return Err(CoreError::Validation(format!(
                "duration_days must be positive, got {d}"
            )));
        }
    }
    if price < 0 {
        return Err(CoreError::Validation(format!(
            "price must not be negative, got {price}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Concrete ticket fields written onto a member when a plan is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannedAssignment {
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub remain_count: Option<i32>,
}

/// Compute the window and balance for a plan starting on `start_date`.
///
/// The end date is the first day the ticket no longer works, so a 30-day
/// plan starting on the 1st is usable through the 30th and ends on the 31st.
pub fn plan_assignment(
    count: Option<i32>,
    duration_days: Option<i32>,
    start_date: Date,
) -> Result<PlannedAssignment, CoreError> {
    let end_date = match duration_days {
        Some(days) if days > 0 => Some(
            start_date
                .checked_add_days(Days::new(days as u64))
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "duration_days {days} overflows the calendar from {start_date}"
                    ))
                })?,
        ),
        Some(days) => {
            return Err(CoreError::Validation(format!(
                "duration_days must be positive, got {days}"
            )))
        }
        None => None,
    };

    Ok(PlannedAssignment {
        start_date,
        end_date,
        remain_count: count,
    })
}
