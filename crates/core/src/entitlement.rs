//! Entitlement resolution for member ticket assignments.
//!
//! A ticket can be bounded by time (`end_date`), by count (`remain_count`),
//! by both, or by neither. The resolver evaluates the date axis first, so
//! an expired ticket reports `Expired` even when its count is also spent.

use serde::Serialize;

use crate::types::Date;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The ticket fields of a member snapshot, borrowed for resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketAssignment<'a> {
    pub ticket_type: Option<&'a str>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub remain_count: Option<i32>,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Derived entitlement of a member at a given day. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum EntitlementState {
    /// The member has never been assigned a ticket.
    NoTicket,
    /// The ticket is usable today.
    Valid {
        remaining_days: Option<i64>,
        remaining_count: Option<i32>,
    },
    /// The ticket's end date has been reached.
    Expired,
    /// The ticket's count balance is spent.
    Exhausted,
}

impl EntitlementState {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Stable lowercase label, used in logs and the attendance log table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTicket => "no_ticket",
            Self::Valid { .. } => "valid",
            Self::Expired => "expired",
            Self::Exhausted => "exhausted",
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Whole days from `today` until `end_date`, floored at zero.
///
/// Returns `None` when the ticket has no end date.
pub fn remaining_days(end_date: Option<Date>, today: Date) -> Option<i64> {
    end_date.map(|end| (end - today).num_days().max(0))
}

/// Resolve the entitlement state of a ticket assignment at `today`.
///
/// `end_date` is the day the ticket stops working: once no whole day is
/// left before it, the ticket is expired.
pub fn resolve(ticket: &TicketAssignment<'_>, today: Date) -> EntitlementState {
    if ticket.ticket_type.is_none() {
        return EntitlementState::NoTicket;
    }

    if let Some(end) = ticket.end_date {
        if end <= today {
            return EntitlementState::Expired;
        }
    }

    if let Some(count) = ticket.remain_count {
        if count <= 0 {
            return EntitlementState::Exhausted;
        }
    }

    EntitlementState::Valid {
        remaining_days: remaining_days(ticket.end_date, today),
        remaining_count: ticket.remain_count,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
