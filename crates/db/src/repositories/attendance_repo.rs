//! Repository for the `attendance_logs` table.
//!
//! Rows are written by [`crate::store::PgMemberStore`] as part of the
//! check-in transaction.

use gymdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::attendance::AttendanceLog;

const COLUMNS: &str = "id, member_id, visit_date, advisory, consumed, checked_in_at";

/// Default number of visits returned in a member's history.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

pub struct AttendanceRepo;

impl AttendanceRepo {
    /// A member's most recent visits, newest first.
    pub async fn list_by_member(
        pool: &PgPool,
        member_id: DbId,
        limit: i64,
    ) -> Result<Vec<AttendanceLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_logs \
             WHERE member_id = $1 \
             ORDER BY checked_in_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, AttendanceLog>(&query)
            .bind(member_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
