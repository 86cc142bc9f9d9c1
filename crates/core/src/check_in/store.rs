//! The storage capability the check-in processor consumes.
//!
//! Implementations must apply [`MemberStore::record_check_in`] atomically
//! per member. The visit is planned with [`decide_visit`] against the
//! member row as it stands under the store's lock, never against the
//! snapshot returned by an earlier lookup.
//!
//! [`decide_visit`]: super::decide_visit

use async_trait::async_trait;
use serde::Serialize;

use crate::entitlement::TicketAssignment;
use crate::types::{Date, DbId};

use super::{CheckInAdvisory, DuplicateCheckInPolicy};

/// The member fields the check-in engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSnapshot {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub ticket_type: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub remain_count: Option<i32>,
    pub visit_count: i32,
    pub last_visit_date: Option<Date>,
}

impl MemberSnapshot {
    /// Borrow the ticket fields for entitlement resolution.
    pub fn ticket(&self) -> TicketAssignment<'_> {
        TicketAssignment {
            ticket_type: self.ticket_type.as_deref(),
            start_date: self.start_date,
            end_date: self.end_date,
            remain_count: self.remain_count,
        }
    }
}

/// What the processor asks a store to do for one check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitRequest {
    pub today: Date,
    pub policy: DuplicateCheckInPolicy,
}

/// The mutation a check-in applies to a member record.
///
/// Stores apply it to the locked row: `visit_count + 1`, and
/// `remain_count - 1` when `consume_count` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitUpdate {
    pub visited_on: Date,
    pub consume_count: bool,
    pub advisory: CheckInAdvisory,
    /// Days left in the window before this visit.
    pub remain_days: Option<i64>,
}

/// Result of [`MemberStore::record_check_in`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// The visit was written. `update` was planned from the locked row and
    /// `member` is the row after the write.
    Recorded {
        update: VisitUpdate,
        member: MemberSnapshot,
    },
    /// Refused by [`DuplicateCheckInPolicy::Reject`]. Nothing was written.
    AlreadyCheckedIn,
}

/// Infrastructure failure inside a [`MemberStore`].
#[derive(Debug, thiserror::Error)]
#[error("Member store failure: {message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Member lookup and update, as needed by check-in.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Find the member whose phone normalizes to `phone_digits`.
    async fn find_by_phone(&self, phone_digits: &str) -> Result<Option<MemberSnapshot>, StoreError>;

    /// Lock member `member_id`, plan the visit with
    /// [`decide_visit`](super::decide_visit) and apply it.
    ///
    /// Returns `None` if the member no longer exists.
    async fn record_check_in(
        &self,
        member_id: DbId,
        request: &VisitRequest,
    ) -> Result<Option<VisitOutcome>, StoreError>;
}
