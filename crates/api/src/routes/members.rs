use axum::routing::{get, post};
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// Member routes mounted at `/members`.
///
/// ```text
/// GET    /                  -> list_members
/// POST   /                  -> create_member
/// GET    /{id}              -> get_member
/// PUT    /{id}              -> update_member
/// DELETE /{id}              -> delete_member
/// GET    /{id}/history      -> member_history
/// POST   /{id}/ticket       -> assign_ticket
/// GET    /{id}/entitlement  -> member_entitlement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(members::list_members).post(members::create_member))
        .route(
            "/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route("/{id}/history", get(members::member_history))
        .route("/{id}/ticket", post(members::assign_ticket))
        .route("/{id}/entitlement", get(members::member_entitlement))
}
