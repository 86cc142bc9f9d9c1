use axum::routing::get;
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Ticket catalog routes mounted at `/tickets`.
///
/// ```text
/// GET    /                            -> list_tickets
/// POST   /                            -> create_ticket
/// GET    /{ticket_type}               -> get_ticket
/// PUT    /{ticket_type}               -> update_ticket
/// DELETE /{ticket_type}               -> delete_ticket
/// GET    /{ticket_type}/delete-info   -> ticket_delete_info
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_tickets).post(tickets::create_ticket))
        .route(
            "/{ticket_type}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route("/{ticket_type}/delete-info", get(tickets::ticket_delete_info))
}
