//! Handlers for the statistics dashboard.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use gymdesk_core::statistics::{fill_hourly, HourlyAttendance};
use gymdesk_core::types::Date;
use gymdesk_db::repositories::StatisticsRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::DateParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/statistics/dashboard
pub async fn dashboard(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let today = state.config.today();
    let stats =
        StatisticsRepo::dashboard(&state.pool, today, state.config.utc_offset_minutes()).await?;

    Ok(Json(DataResponse { data: stats }))
}

/// Per-hour check-ins for one business day.
#[derive(Debug, Serialize)]
pub struct HourlyReport {
    pub date: Date,
    pub hours: Vec<HourlyAttendance>,
}

/// GET /api/v1/statistics/attendance/hourly?date=YYYY-MM-DD
///
/// Defaults to today. Always returns 24 buckets.
pub async fn hourly_attendance(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = params.date.unwrap_or_else(|| state.config.today());
    let counts =
        StatisticsRepo::hourly_counts(&state.pool, date, state.config.utc_offset_minutes())
            .await?;

    Ok(Json(DataResponse {
        data: HourlyReport {
            date,
            hours: fill_hourly(&counts),
        },
    }))
}
