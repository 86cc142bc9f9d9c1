//! Member entity model and DTOs.

use gymdesk_core::check_in::MemberSnapshot;
use gymdesk_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::double_option;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub birth_date: Option<Date>,
    pub gender: Option<String>,
    pub status: String,
    pub memo: Option<String>,
    pub emergency_contact: Option<String>,
    pub ticket_type: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub remain_count: Option<i32>,
    pub visit_count: i32,
    pub last_visit_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Member {
    /// The fields check-in reads.
    pub fn snapshot(&self) -> MemberSnapshot {
        MemberSnapshot {
            id: self.id,
            name: self.name.clone(),
            phone: self.phone.clone(),
            ticket_type: self.ticket_type.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            remain_count: self.remain_count,
            visit_count: self.visit_count,
            last_visit_date: self.last_visit_date,
        }
    }
}

impl From<Member> for MemberSnapshot {
    fn from(m: Member) -> Self {
        MemberSnapshot {
            id: m.id,
            name: m.name,
            phone: m.phone,
            ticket_type: m.ticket_type,
            start_date: m.start_date,
            end_date: m.end_date,
            remain_count: m.remain_count,
            visit_count: m.visit_count,
            last_visit_date: m.last_visit_date,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for registering a member. New members hold no ticket.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMember {
    #[validate(length(min = 2, max = 100, message = "must be 2-100 characters"))]
    pub name: String,
    pub phone: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub birth_date: Option<Date>,
    pub gender: Option<String>,
    pub status: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub memo: Option<String>,
    #[validate(length(max = 30, message = "must be at most 30 characters"))]
    pub emergency_contact: Option<String>,
}

/// DTO for patching a member. Absent fields are left unchanged; nullable
/// profile fields accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMember {
    #[validate(length(min = 2, max = 100, message = "must be 2-100 characters"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub birth_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "double_option")]
    pub gender: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub memo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub emergency_contact: Option<Option<String>>,
}

/// DTO for assigning a catalog ticket to a member.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignTicket {
    pub ticket_type: String,
    /// Defaults to the current business day.
    pub start_date: Option<Date>,
}

// ---------------------------------------------------------------------------
// List queries
// ---------------------------------------------------------------------------

/// Query parameters for `GET /members`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches name (case-insensitive) or phone digits.
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// One page of members.
#[derive(Debug, Clone, Serialize)]
pub struct MemberListPage {
    pub members: Vec<Member>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// A validated list query, as [`crate::repositories::MemberRepo::list`] takes it.
#[derive(Debug, Clone, Copy)]
pub struct MemberFilter<'a> {
    pub search: Option<&'a str>,
    pub status: Option<&'a str>,
    /// One of the whitelisted sort columns.
    pub sort_column: &'static str,
    /// `ASC` or `DESC`.
    pub sort_dir: &'static str,
    pub limit: i64,
    pub offset: i64,
}
