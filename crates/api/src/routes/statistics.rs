use axum::routing::get;
use axum::Router;

use crate::handlers::statistics;
use crate::state::AppState;

/// Statistics routes mounted at `/statistics`.
///
/// ```text
/// GET    /dashboard           -> dashboard
/// GET    /attendance/hourly   -> hourly_attendance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(statistics::dashboard))
        .route("/attendance/hourly", get(statistics::hourly_attendance))
}
