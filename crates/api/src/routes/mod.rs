pub mod attendance;
pub mod health;
pub mod members;
pub mod statistics;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /attendance/check                                check-in (POST)
///
/// /members                                         list, create
/// /members/{id}                                    get, update, delete
/// /members/{id}/history                            registrations + visits
/// /members/{id}/ticket                             assign ticket (POST)
/// /members/{id}/entitlement                        current entitlement
///
/// /tickets                                         list, create
/// /tickets/{ticket_type}                           get, update, delete
/// /tickets/{ticket_type}/delete-info               affected member count
///
/// /statistics/dashboard                            dashboard aggregate
/// /statistics/attendance/hourly                    per-hour check-ins
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/attendance", attendance::router())
        .nest("/members", members::router())
        .nest("/tickets", tickets::router())
        .nest("/statistics", statistics::router())
}
