//! Read-only aggregates behind the statistics dashboard.
//!
//! Timestamps are bucketed into business days by shifting them by the
//! configured UTC offset (in minutes) before taking the date or hour.

use chrono::Days;
use gymdesk_core::check_in::CheckInAdvisory;
use gymdesk_core::statistics::{
    self, ActivityType, ExpiryCandidate, RecentActivity, EXPIRING_HORIZON_DAYS,
    RECENT_ACTIVITY_LIMIT, TREND_DAYS,
};
use gymdesk_core::types::Date;
use sqlx::PgPool;

use crate::models::statistics::{
    CheckInFeedRow, DashboardStats, ExpiredFeedRow, ExpiryRow, MonthlyStats, NewMemberFeedRow,
    RegistrationFeedRow, TodayAttendance,
};

/// How far back the expired-ticket feed looks, in days.
const EXPIRED_FEED_DAYS: u64 = 7;

/// SQL expression for the business-day date of a `TIMESTAMPTZ` column.
fn local_date(column: &str, offset_param: u32) -> String {
    format!("(({column} AT TIME ZONE 'UTC') + make_interval(mins => ${offset_param}))::date")
}

/// Provides dashboard queries.
pub struct StatisticsRepo;

impl StatisticsRepo {
    /// Assemble the full dashboard for `today`.
    pub async fn dashboard(
        pool: &PgPool,
        today: Date,
        utc_offset_minutes: i32,
    ) -> Result<DashboardStats, sqlx::Error> {
        let today_attendance = Self::today_attendance(pool, today, utc_offset_minutes).await?;
        let candidates = Self::expiry_candidates(pool, today).await?;
        let monthly_stats = Self::monthly_stats(pool, today, utc_offset_minutes).await?;
        let daily = Self::daily_counts(pool, statistics::trend_start(today, TREND_DAYS), today).await?;
        let recent_activities =
            Self::recent_activities(pool, today, RECENT_ACTIVITY_LIMIT).await?;

        Ok(DashboardStats {
            today_attendance,
            expiring_memberships: statistics::summarize_expiring(&candidates, today),
            monthly_stats,
            attendance_trend: statistics::fill_daily_trend(&daily, today, TREND_DAYS),
            recent_activities,
        })
    }

    // -----------------------------------------------------------------------
    // Widgets
    // -----------------------------------------------------------------------

    /// Check-ins on `today`, split by whether the member joined today.
    pub async fn today_attendance(
        pool: &PgPool,
        today: Date,
        utc_offset_minutes: i32,
    ) -> Result<TodayAttendance, sqlx::Error> {
        let joined = local_date("m.created_at", 2);
        let query = format!(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE {joined} = $1) AS new_members, \
                COUNT(*) FILTER (WHERE {joined} <> $1) AS check_ins \
             FROM attendance_logs a \
             JOIN members m ON m.id = a.member_id \
             WHERE a.visit_date = $1"
        );
        sqlx::query_as::<_, TodayAttendance>(&query)
            .bind(today)
            .bind(utc_offset_minutes)
            .fetch_one(pool)
            .await
    }

    /// Members whose dated ticket ends within the expiry horizon.
    pub async fn expiry_candidates(
        pool: &PgPool,
        today: Date,
    ) -> Result<Vec<ExpiryCandidate>, sqlx::Error> {
        let horizon = today
            .checked_add_days(Days::new(EXPIRING_HORIZON_DAYS as u64))
            .unwrap_or(today);
        let rows = sqlx::query_as::<_, ExpiryRow>(
            "SELECT id, name, phone, end_date, remain_count FROM members \
             WHERE ticket_type IS NOT NULL AND end_date > $1 AND end_date <= $2 \
             ORDER BY end_date, id",
        )
        .bind(today)
        .bind(horizon)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ExpiryCandidate {
                member_id: r.id,
                member_name: r.name,
                phone: r.phone,
                end_date: r.end_date,
                remain_count: r.remain_count,
            })
            .collect())
    }

    /// Signups, revenue and activity for the month containing `today`.
    pub async fn monthly_stats(
        pool: &PgPool,
        today: Date,
        utc_offset_minutes: i32,
    ) -> Result<MonthlyStats, sqlx::Error> {
        let (month_start, next_month) = statistics::month_bounds(today);
        let joined = local_date("created_at", 4);
        let query = format!(
            "SELECT \
                (SELECT COUNT(*) FROM members \
                  WHERE {joined} >= $1 AND {joined} < $2) AS new_members, \
                (SELECT COALESCE(SUM(price), 0)::BIGINT FROM registrations \
                  WHERE start_date >= $1 AND start_date < $2) AS revenue, \
                (SELECT COUNT(*) FROM members) AS total_members, \
                (SELECT COUNT(*) FROM members WHERE last_visit_date >= $3) AS active_members"
        );
        sqlx::query_as::<_, MonthlyStats>(&query)
            .bind(month_start)
            .bind(next_month)
            .bind(statistics::active_since(today))
            .bind(utc_offset_minutes)
            .fetch_one(pool)
            .await
    }

    /// Check-in counts per visit date in `[start, end]`. Days without
    /// visits are absent.
    pub async fn daily_counts(
        pool: &PgPool,
        start: Date,
        end: Date,
    ) -> Result<Vec<(Date, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (Date, i64)>(
            "SELECT visit_date, COUNT(*) FROM attendance_logs \
             WHERE visit_date BETWEEN $1 AND $2 \
             GROUP BY visit_date \
             ORDER BY visit_date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Check-in counts per local hour on `day`. Hours without visits are absent.
    pub async fn hourly_counts(
        pool: &PgPool,
        day: Date,
        utc_offset_minutes: i32,
    ) -> Result<Vec<(i32, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (i32, i64)>(
            "SELECT \
                EXTRACT(HOUR FROM (checked_in_at AT TIME ZONE 'UTC') \
                    + make_interval(mins => $2))::INT AS hour, \
                COUNT(*) \
             FROM attendance_logs \
             WHERE visit_date = $1 \
             GROUP BY hour \
             ORDER BY hour",
        )
        .bind(day)
        .bind(utc_offset_minutes)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Activity feed
    // -----------------------------------------------------------------------

    /// Latest check-ins, ticket issues, signups and expiries, newest first.
    pub async fn recent_activities(
        pool: &PgPool,
        today: Date,
        limit: usize,
    ) -> Result<Vec<RecentActivity>, sqlx::Error> {
        let per_feed = limit as i64;

        let check_ins = sqlx::query_as::<_, CheckInFeedRow>(
            "SELECT a.id, m.name AS member_name, a.advisory, a.checked_in_at \
             FROM attendance_logs a JOIN members m ON m.id = a.member_id \
             ORDER BY a.checked_in_at DESC, a.id DESC LIMIT $1",
        )
        .bind(per_feed)
        .fetch_all(pool)
        .await?;

        let issued = sqlx::query_as::<_, RegistrationFeedRow>(
            "SELECT r.id, m.name AS member_name, r.ticket_type, r.created_at \
             FROM registrations r JOIN members m ON m.id = r.member_id \
             ORDER BY r.created_at DESC, r.id DESC LIMIT $1",
        )
        .bind(per_feed)
        .fetch_all(pool)
        .await?;

        let joined = sqlx::query_as::<_, NewMemberFeedRow>(
            "SELECT id, name, created_at FROM members \
             ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(per_feed)
        .fetch_all(pool)
        .await?;

        let feed_start = today
            .checked_sub_days(Days::new(EXPIRED_FEED_DAYS))
            .unwrap_or(today);
        let expired = sqlx::query_as::<_, ExpiredFeedRow>(
            "SELECT id, name, ticket_type, end_date FROM members \
             WHERE ticket_type IS NOT NULL AND end_date > $1 AND end_date <= $2 \
             ORDER BY end_date DESC, id DESC LIMIT $3",
        )
        .bind(feed_start)
        .bind(today)
        .bind(per_feed)
        .fetch_all(pool)
        .await?;

        let feed = check_ins
            .into_iter()
            .map(|r| RecentActivity {
                id: format!("check-in-{}", r.id),
                kind: ActivityType::CheckIn,
                member_name: r.member_name,
                timestamp: r.checked_in_at,
                details: check_in_details(&r.advisory),
            })
            .chain(issued.into_iter().map(|r| RecentActivity {
                id: format!("ticket-{}", r.id),
                kind: ActivityType::MembershipIssued,
                member_name: r.member_name,
                timestamp: r.created_at,
                details: format!("Issued {}", r.ticket_type),
            }))
            .chain(joined.into_iter().map(|r| RecentActivity {
                id: format!("member-{}", r.id),
                kind: ActivityType::NewMember,
                member_name: r.name,
                timestamp: r.created_at,
                details: "Registered".to_string(),
            }))
            .chain(expired.into_iter().map(|r| RecentActivity {
                id: format!("expired-{}", r.id),
                kind: ActivityType::MembershipExpired,
                member_name: r.name,
                timestamp: statistics::expiry_timestamp(r.end_date),
                details: format!("{} expired", r.ticket_type),
            }));

        Ok(statistics::merge_recent_activities(feed, limit))
    }
}

fn check_in_details(advisory: &str) -> String {
    if advisory == CheckInAdvisory::Completed.code() {
        "Checked in".to_string()
    } else {
        format!("Checked in ({advisory})")
    }
}
