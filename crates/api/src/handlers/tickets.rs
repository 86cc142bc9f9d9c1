//! Handlers for the ticket catalog.
//!
//! Catalog entries are keyed by their `ticket_type` name. Deleting an
//! entry leaves members' copied ticket fields untouched.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gymdesk_core::error::CoreError;
use gymdesk_core::ticket::{validate_plan, validate_ticket_type};
use gymdesk_db::models::ticket::{CreateTicket, TicketDeleteInfo, TicketList, UpdateTicket};
use gymdesk_db::repositories::TicketRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn ticket_not_found(ticket_type: &str) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Ticket",
        key: ticket_type.to_string(),
    })
}

/// GET /api/v1/tickets
pub async fn list_tickets(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tickets = TicketRepo::list(&state.pool).await?;
    let total = tickets.len();

    Ok(Json(DataResponse {
        data: TicketList { tickets, total },
    }))
}

/// POST /api/v1/tickets
///
/// A duplicate `ticket_type` is a conflict.
pub async fn create_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_ticket_type(&input.ticket_type)?;
    validate_plan(input.count, input.duration_days, input.price)?;

    let ticket = TicketRepo::create(&state.pool, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Ticket '{}' already exists",
                input.ticket_type.trim()
            )))
        })?;

    tracing::info!(ticket_type = %ticket.ticket_type, user = %auth.subject, "Ticket created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/tickets/{ticket_type}
pub async fn get_ticket(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_type): Path<String>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::find(&state.pool, &ticket_type)
        .await?
        .ok_or_else(|| ticket_not_found(&ticket_type))?;

    Ok(Json(DataResponse { data: ticket }))
}

/// PUT /api/v1/tickets/{ticket_type}
///
/// Partial update. The merged plan must still bound usage.
pub async fn update_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_type): Path<String>,
    Json(input): Json<UpdateTicket>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let current = TicketRepo::find(&state.pool, &ticket_type)
        .await?
        .ok_or_else(|| ticket_not_found(&ticket_type))?;

    let (count, duration_days, price, description) = input.merged(&current);
    validate_plan(count, duration_days, price)?;

    let ticket = TicketRepo::update(
        &state.pool,
        &ticket_type,
        count,
        duration_days,
        price,
        description.as_deref(),
    )
    .await?
    .ok_or_else(|| ticket_not_found(&ticket_type))?;

    tracing::info!(ticket_type = %ticket.ticket_type, user = %auth.subject, "Ticket updated");

    Ok(Json(DataResponse { data: ticket }))
}

/// GET /api/v1/tickets/{ticket_type}/delete-info
///
/// How many members currently hold this ticket type.
pub async fn ticket_delete_info(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_type): Path<String>,
) -> AppResult<impl IntoResponse> {
    TicketRepo::find(&state.pool, &ticket_type)
        .await?
        .ok_or_else(|| ticket_not_found(&ticket_type))?;

    let affected_member_count = TicketRepo::count_members_using(&state.pool, &ticket_type).await?;

    Ok(Json(DataResponse {
        data: TicketDeleteInfo {
            ticket_type,
            affected_member_count,
        },
    }))
}

/// DELETE /api/v1/tickets/{ticket_type}
pub async fn delete_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_type): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = TicketRepo::delete(&state.pool, &ticket_type).await?;
    if !deleted {
        return Err(ticket_not_found(&ticket_type));
    }

    tracing::info!(ticket_type = %ticket_type, user = %auth.subject, "Ticket deleted");

    Ok(StatusCode::NO_CONTENT)
}
