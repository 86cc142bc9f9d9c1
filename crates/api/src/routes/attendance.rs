use axum::routing::post;
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Attendance routes mounted at `/attendance`.
///
/// ```text
/// POST   /check             -> check_in
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/check", post(attendance::check_in))
}
