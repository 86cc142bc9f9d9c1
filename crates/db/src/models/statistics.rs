//! Dashboard aggregate shapes.

use gymdesk_core::statistics::{ExpiringMemberships, RecentActivity, TrendPoint};
use gymdesk_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Today's check-ins split by whether the member joined today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct TodayAttendance {
    pub total: i64,
    pub new_members: i64,
    pub check_ins: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct MonthlyStats {
    pub new_members: i64,
    pub revenue: i64,
    pub total_members: i64,
    pub active_members: i64,
}

/// Everything the dashboard renders in one response.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub today_attendance: TodayAttendance,
    pub expiring_memberships: ExpiringMemberships,
    pub monthly_stats: MonthlyStats,
    pub attendance_trend: Vec<TrendPoint>,
    pub recent_activities: Vec<RecentActivity>,
}

// ---------------------------------------------------------------------------
// Raw feed rows
// ---------------------------------------------------------------------------

/// A member with a dated ticket, loaded for the expiry widget.
#[derive(Debug, Clone, FromRow)]
pub struct ExpiryRow {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub end_date: Date,
    pub remain_count: Option<i32>,
}

/// A check-in joined to its member name.
#[derive(Debug, Clone, FromRow)]
pub struct CheckInFeedRow {
    pub id: DbId,
    pub member_name: String,
    pub advisory: String,
    pub checked_in_at: Timestamp,
}

/// A ticket issue joined to its member name.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationFeedRow {
    pub id: DbId,
    pub member_name: String,
    pub ticket_type: String,
    pub created_at: Timestamp,
}

/// A newly registered member.
#[derive(Debug, Clone, FromRow)]
pub struct NewMemberFeedRow {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A ticket that ran out on a date inside the activity window.
#[derive(Debug, Clone, FromRow)]
pub struct ExpiredFeedRow {
    pub id: DbId,
    pub name: String,
    pub ticket_type: String,
    pub end_date: Date,
}
