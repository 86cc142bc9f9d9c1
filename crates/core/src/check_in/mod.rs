//! Attendance check-in: lookup, entitlement, and balance consumption.
//!
//! A check-in always records the visit. The ticket balance is consumed
//! only when the member's entitlement was valid before the visit and the
//! ticket is count-bounded. Unentitled visits still succeed and carry an
//! advisory; the only domain failure is an unknown phone number.

pub mod memory;
pub mod store;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::entitlement::{self, EntitlementState};
use crate::phone::normalize_phone;
use crate::types::{Date, DbId};

pub use store::{MemberSnapshot, MemberStore, StoreError, VisitOutcome, VisitRequest, VisitUpdate};

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

/// Informational qualifier on a successful check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckInAdvisory {
    /// Entitled visit.
    Completed,
    /// Member holds no ticket.
    NoActiveTicket,
    /// Member's ticket window has ended.
    TicketExpired,
    /// Member's count balance is spent.
    NoRemainCount,
}

impl CheckInAdvisory {
    /// Derive the advisory from the pre-visit entitlement.
    pub fn from_state(state: &EntitlementState) -> Self {
        match state {
            EntitlementState::NoTicket => Self::NoActiveTicket,
            EntitlementState::Expired => Self::TicketExpired,
            EntitlementState::Exhausted => Self::NoRemainCount,
            EntitlementState::Valid { .. } => Self::Completed,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::NoActiveTicket => "NO_ACTIVE_TICKET",
            Self::TicketExpired => "TICKET_EXPIRED",
            Self::NoRemainCount => "NO_REMAIN_COUNT",
        }
    }

    /// Display message for the kiosk.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Completed => "Check-in completed.",
            Self::NoActiveTicket => "Check-in completed. (no active ticket)",
            Self::TicketExpired => "Check-in completed. (ticket expired)",
            Self::NoRemainCount => "Check-in completed. (no remaining count)",
        }
    }
}

impl fmt::Display for CheckInAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Duplicate policy
// ---------------------------------------------------------------------------

/// What to do when a member checks in twice on the same day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateCheckInPolicy {
    /// Record every visit; a second same-day visit consumes again.
    #[default]
    Allow,
    /// Refuse a second same-day visit before anything is written.
    Reject,
}

impl FromStr for DuplicateCheckInPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "Invalid duplicate check-in policy '{other}'. Must be 'allow' or 'reject'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    /// No member matches the phone number. Nothing was written.
    #[error("No member registered with phone '{phone}'")]
    MemberNotFound { phone: String },

    /// Duplicate same-day check-in under [`DuplicateCheckInPolicy::Reject`].
    #[error("Member {member_id} has already checked in today")]
    AlreadyCheckedIn { member_id: DbId },

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Receipt
// ---------------------------------------------------------------------------

/// Result of a successful check-in, shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInReceipt {
    pub member_id: DbId,
    pub member_name: String,
    pub phone: String,
    pub ticket_type: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Balance after this visit.
    pub remain_count: Option<i32>,
    /// Days left in the window, computed before this visit.
    pub remain_days: Option<i64>,
    pub visit_count: i32,
    pub last_visit_date: Date,
    pub advisory: CheckInAdvisory,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Decide the entitlement and mutation for a visit without touching storage.
pub fn plan_visit(member: &MemberSnapshot, today: Date) -> (EntitlementState, VisitUpdate) {
    let state = entitlement::resolve(&member.ticket(), today);
    let update = VisitUpdate {
        visited_on: today,
        consume_count: state.is_valid() && member.remain_count.is_some(),
        advisory: CheckInAdvisory::from_state(&state),
        remain_days: entitlement::remaining_days(member.end_date, today),
    };
    (state, update)
}

/// Plan a visit against the locked member row, applying the duplicate
/// policy. `None` means the visit must be refused without writing.
pub fn decide_visit(locked: &MemberSnapshot, request: &VisitRequest) -> Option<VisitUpdate> {
    if request.policy == DuplicateCheckInPolicy::Reject
        && locked.last_visit_date == Some(request.today)
    {
        return None;
    }
    Some(plan_visit(locked, request.today).1)
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

/// Runs check-ins against an injected [`MemberStore`].
///
/// Cheap to clone; the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct CheckInProcessor {
    store: Arc<dyn MemberStore>,
    policy: DuplicateCheckInPolicy,
}

impl CheckInProcessor {
    pub fn new(store: Arc<dyn MemberStore>, policy: DuplicateCheckInPolicy) -> Self {
        Self { store, policy }
    }

    /// Check in the member identified by `raw_phone` on `today`.
    pub async fn check_in(&self, raw_phone: &str, today: Date) -> Result<CheckInReceipt, CheckInError> {
        let digits = normalize_phone(raw_phone);
        let not_found = || CheckInError::MemberNotFound {
            phone: raw_phone.trim().to_string(),
        };
        if digits.is_empty() {
            return Err(not_found());
        }

        let member = self
            .store
            .find_by_phone(&digits)
            .await?
            .ok_or_else(not_found)?;

        let request = VisitRequest {
            today,
            policy: self.policy,
        };
        let outcome = self
            .store
            .record_check_in(member.id, &request)
            .await?
            .ok_or_else(not_found)?;

        let (update, updated) = match outcome {
            VisitOutcome::Recorded { update, member } => (update, member),
            VisitOutcome::AlreadyCheckedIn => {
                return Err(CheckInError::AlreadyCheckedIn {
                    member_id: member.id,
                })
            }
        };

        Ok(CheckInReceipt {
            member_id: updated.id,
            member_name: updated.name,
            phone: updated.phone,
            ticket_type: updated.ticket_type,
            start_date: updated.start_date,
            end_date: updated.end_date,
            remain_count: updated.remain_count,
            remain_days: update.remain_days,
            visit_count: updated.visit_count,
            last_visit_date: updated.last_visit_date.unwrap_or(today),
            advisory: update.advisory,
            message: update.advisory.message(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
