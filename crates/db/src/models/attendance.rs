//! Attendance log model.

use gymdesk_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attendance_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceLog {
    pub id: DbId,
    pub member_id: DbId,
    pub visit_date: Date,
    pub advisory: String,
    pub consumed: bool,
    pub checked_in_at: Timestamp,
}
