//! Dashboard aggregation helpers.
//!
//! The repository layer fetches raw counts and rows; these pure functions
//! shape them into the dashboard payload (bucketing, zero-filling, merge
//! ordering) so the rules are testable without a database.

use chrono::{Datelike, Days, Months, NaiveTime};
use serde::Serialize;

use crate::entitlement;
use crate::ticket::MembershipType;
use crate::types::{Date, DbId, Timestamp};

/// Expiry horizon shown on the dashboard, in days.
pub const EXPIRING_HORIZON_DAYS: i64 = 7;

/// Number of days in the attendance trend.
pub const TREND_DAYS: u64 = 7;

/// Members counted as active when they visited within this many days.
pub const ACTIVE_WINDOW_DAYS: u64 = 30;

/// Maximum entries in the recent activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Expiring memberships
// ---------------------------------------------------------------------------

/// A member holding a dated ticket, as loaded for the expiry widget.
#[derive(Debug, Clone)]
pub struct ExpiryCandidate {
    pub member_id: DbId,
    pub member_name: String,
    pub phone: String,
    pub end_date: Date,
    pub remain_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiringMember {
    pub id: DbId,
    pub member_name: String,
    pub membership_type: MembershipType,
    pub expiry_date: Date,
    pub days_remaining: i64,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpiringMemberships {
    pub within_7_days: usize,
    pub within_3_days: usize,
    pub within_1_day: usize,
    pub list: Vec<ExpiringMember>,
}

/// Bucket candidates by days until expiry.
///
/// A ticket ending today has already expired and is dropped, as are those
/// beyond the horizon. Buckets are cumulative: a ticket ending tomorrow is
/// counted in all three.
pub fn summarize_expiring(candidates: &[ExpiryCandidate], today: Date) -> ExpiringMemberships {
    let mut summary = ExpiringMemberships::default();

    for c in candidates {
        let days = (c.end_date - today).num_days();
        if !(1..=EXPIRING_HORIZON_DAYS).contains(&days) {
            continue;
        }
        summary.within_7_days += 1;
        if days <= 3 {
            summary.within_3_days += 1;
        }
        if days <= 1 {
            summary.within_1_day += 1;
        }
        summary.list.push(ExpiringMember {
            id: c.member_id,
            member_name: c.member_name.clone(),
            membership_type: MembershipType::classify(Some(c.end_date), c.remain_count),
            expiry_date: c.end_date,
            days_remaining: entitlement::remaining_days(Some(c.end_date), today).unwrap_or(0),
            phone: c.phone.clone(),
        });
    }

    summary
        .list
        .sort_by(|a, b| a.days_remaining.cmp(&b.days_remaining).then(a.id.cmp(&b.id)));
    summary
}

// ---------------------------------------------------------------------------
// Reporting windows
// ---------------------------------------------------------------------------

/// First day of `today`'s month and first day of the following month.
pub fn month_bounds(today: Date) -> (Date, Date) {
    let start = today.with_day(1).unwrap_or(today);
    let next = start.checked_add_months(Months::new(1)).unwrap_or(start);
    (start, next)
}

/// Earliest last-visit date that still counts a member as active.
pub fn active_since(today: Date) -> Date {
    today
        .checked_sub_days(Days::new(ACTIVE_WINDOW_DAYS))
        .unwrap_or(today)
}

// ---------------------------------------------------------------------------
// Attendance trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: Date,
    pub count: i64,
}

/// First day of a trend window of `days` days ending on `end`.
pub fn trend_start(end: Date, days: u64) -> Date {
    end.checked_sub_days(Days::new(days.saturating_sub(1)))
        .unwrap_or(end)
}

/// Expand sparse per-day counts into a contiguous, zero-filled series.
pub fn fill_daily_trend(counts: &[(Date, i64)], end: Date, days: u64) -> Vec<TrendPoint> {
    let start = trend_start(end, days);
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| TrendPoint {
            date,
            count: counts
                .iter()
                .find(|(d, _)| *d == date)
                .map(|(_, n)| *n)
                .unwrap_or(0),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hourly attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyAttendance {
    pub hour: u32,
    pub count: i64,
    pub label: String,
}

/// Expand sparse `(hour, count)` pairs into 24 labelled buckets.
pub fn fill_hourly(counts: &[(i32, i64)]) -> Vec<HourlyAttendance> {
    (0u32..24)
        .map(|hour| HourlyAttendance {
            hour,
            count: counts
                .iter()
                .filter(|(h, _)| *h == hour as i32)
                .map(|(_, n)| *n)
                .sum(),
            label: format!("{hour:02}:00"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Recent activity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    CheckIn,
    MembershipIssued,
    MembershipExpired,
    NewMember,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub member_name: String,
    pub timestamp: Timestamp,
    pub details: String,
}

/// Timestamp used for a ticket expiry event: midnight starting the end date.
pub fn expiry_timestamp(end_date: Date) -> Timestamp {
    end_date.and_time(NaiveTime::MIN).and_utc()
}

/// Merge activity feeds newest first, keeping at most `limit` entries.
pub fn merge_recent_activities(
    feeds: impl IntoIterator<Item = RecentActivity>,
    limit: usize,
) -> Vec<RecentActivity> {
    let mut all: Vec<RecentActivity> = feeds.into_iter().collect();
    all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    all.truncate(limit);
    all
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn today() -> Date {
        Date::from_ymd_opt(2025, 10, 20).unwrap()
    }

    fn candidate(id: DbId, days: i64, count: Option<i32>) -> ExpiryCandidate {
        ExpiryCandidate {
            member_id: id,
            member_name: format!("M{id}"),
            phone: "010-0000-0000".into(),
            end_date: today() + chrono::Duration::days(days),
            remain_count: count,
        }
    }

    // -- summarize_expiring ---------------------------------------------------

    #[test]
    fn buckets_are_cumulative() {
        let s = summarize_expiring(
            &[
                candidate(1, 1, None),
                candidate(2, 1, None),
                candidate(3, 3, Some(2)),
                candidate(4, 7, None),
            ],
            today(),
        );
        assert_eq!(s.within_7_days, 4);
        assert_eq!(s.within_3_days, 3);
        assert_eq!(s.within_1_day, 2);
    }

    #[test]
    fn expired_and_distant_are_dropped() {
        let s = summarize_expiring(
            &[candidate(1, -1, None), candidate(2, 0, None), candidate(3, 8, None)],
            today(),
        );
        assert_eq!(s, ExpiringMemberships::default());
    }

    #[test]
    fn list_sorted_by_days_remaining_with_types() {
        let s = summarize_expiring(&[candidate(9, 5, Some(1)), candidate(3, 2, None)], today());
        let ids: Vec<_> = s.list.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 9]);
        assert_eq!(s.list[0].membership_type, MembershipType::Period);
        assert_eq!(s.list[0].days_remaining, 2);
        assert_eq!(s.list[1].membership_type, MembershipType::Count);
    }

    // -- trend ----------------------------------------------------------------

    #[test]
    fn trend_is_zero_filled_and_ordered() {
        let yesterday = today().pred_opt().unwrap();
        let points = fill_daily_trend(&[(today(), 4), (yesterday, 2)], today(), TREND_DAYS);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, trend_start(today(), TREND_DAYS));
        assert_eq!(points[0].count, 0);
        assert_eq!(points[5], TrendPoint { date: yesterday, count: 2 });
        assert_eq!(points[6], TrendPoint { date: today(), count: 4 });
    }

    #[test]
    fn month_bounds_cover_calendar_month() {
        let (start, next) = month_bounds(Date::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(start, Date::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(next, Date::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn active_window_is_thirty_days_back() {
        assert_eq!(active_since(today()), Date::from_ymd_opt(2025, 9, 20).unwrap());
    }

    #[test]
    fn trend_start_for_single_day_is_end() {
        assert_eq!(trend_start(today(), 1), today());
    }

    // -- hourly ---------------------------------------------------------------

    #[test]
    fn hourly_has_24_labelled_buckets() {
        let buckets = fill_hourly(&[(9, 5), (18, 2)]);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[0].label, "00:00");
        assert_eq!(buckets[9].count, 5);
        assert_eq!(buckets[18].label, "18:00");
        assert_eq!(buckets[18].count, 2);
        assert_eq!(buckets[23].count, 0);
    }

    // -- recent activity ------------------------------------------------------

    fn activity(id: &str, minute: u32) -> RecentActivity {
        RecentActivity {
            id: id.into(),
            kind: ActivityType::CheckIn,
            member_name: "Kim".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 10, 20, 9, minute, 0).unwrap(),
            details: String::new(),
        }
    }

    #[test]
    fn merge_orders_newest_first_and_truncates() {
        let merged = merge_recent_activities(
            vec![activity("a", 1), activity("b", 30), activity("c", 15)],
            2,
        );
        let ids: Vec<_> = merged.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn expiry_timestamp_is_midnight_of_end_date() {
        let ts = expiry_timestamp(today());
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap());
    }
}
