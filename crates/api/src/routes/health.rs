use axum::extract::State;
use axum::{routing::get, Json, Router};
use gymdesk_core::types::Date;
use serde::Serialize;

use crate::state::AppState;

/// Liveness payload. Front-desk kiosks also read `business_date` to
/// confirm which day check-ins will be booked under.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub business_date: Date,
    pub utc_offset_minutes: i32,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match gymdesk_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        business_date: state.config.today(),
        utc_offset_minutes: state.config.utc_offset_minutes(),
    })
}

/// Root-level routes, outside `/api/v1` and without authentication.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
