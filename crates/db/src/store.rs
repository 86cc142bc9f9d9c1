//! PostgreSQL implementation of the check-in [`MemberStore`].

use async_trait::async_trait;
use gymdesk_core::check_in::{
    decide_visit, MemberSnapshot, MemberStore, StoreError, VisitOutcome, VisitRequest,
};
use gymdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::Member;
use crate::repositories::member_repo::COLUMNS;

/// Check-in storage backed by the `members` and `attendance_logs` tables.
#[derive(Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn find_by_phone(&self, phone_digits: &str) -> Result<Option<MemberSnapshot>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE phone_digits = $1");
        let member = sqlx::query_as::<_, Member>(&query)
            .bind(phone_digits)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::with_source("member lookup failed", e))?;
        Ok(member.map(MemberSnapshot::from))
    }

    /// Lock the member row, plan the visit against it, apply the plan and
    /// append an attendance log, all in one transaction.
    async fn record_check_in(
        &self,
        member_id: DbId,
        request: &VisitRequest,
    ) -> Result<Option<VisitOutcome>, StoreError> {
        let fail = |e: sqlx::Error| StoreError::with_source("check-in write failed", e);

        let mut tx = self.pool.begin().await.map_err(fail)?;

        let lock = format!("SELECT {COLUMNS} FROM members WHERE id = $1 FOR UPDATE");
        let locked = sqlx::query_as::<_, Member>(&lock)
            .bind(member_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(fail)?;

        let Some(locked) = locked.map(MemberSnapshot::from) else {
            return Ok(None);
        };
        let Some(update) = decide_visit(&locked, request) else {
            tracing::debug!(member_id, "Duplicate same-day check-in refused");
            return Ok(Some(VisitOutcome::AlreadyCheckedIn));
        };

        let query = format!(
            "UPDATE members SET \
                visit_count = visit_count + 1, \
                last_visit_date = $2, \
                remain_count = CASE WHEN $3 THEN remain_count - 1 ELSE remain_count END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, Member>(&query)
            .bind(member_id)
            .bind(update.visited_on)
            .bind(update.consume_count)
            .fetch_one(&mut *tx)
            .await
            .map_err(fail)?;

        sqlx::query(
            "INSERT INTO attendance_logs (member_id, visit_date, advisory, consumed) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(member_id)
        .bind(update.visited_on)
        .bind(update.advisory.code())
        .bind(update.consume_count)
        .execute(&mut *tx)
        .await
        .map_err(fail)?;

        tx.commit().await.map_err(fail)?;

        tracing::debug!(
            member_id,
            consumed = update.consume_count,
            advisory = %update.advisory,
            "Check-in recorded",
        );
        Ok(Some(VisitOutcome::Recorded {
            update,
            member: member.into(),
        }))
    }
}
