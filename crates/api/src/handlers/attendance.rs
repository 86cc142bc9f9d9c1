//! Kiosk check-in handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /attendance/check`.
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    /// Phone number as typed; any formatting is accepted.
    pub phone: String,
}

/// POST /api/v1/attendance/check
///
/// Record a visit for the member with this phone number. Unentitled
/// visits still succeed and carry an advisory code.
pub async fn check_in(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CheckInRequest>,
) -> AppResult<impl IntoResponse> {
    let today = state.config.today();
    let receipt = state.check_in.check_in(&input.phone, today).await?;

    tracing::info!(
        member_id = receipt.member_id,
        advisory = %receipt.advisory,
        remain_count = ?receipt.remain_count,
        user = %auth.subject,
        "Check-in recorded",
    );

    Ok(Json(DataResponse { data: receipt }))
}
