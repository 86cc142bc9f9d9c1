//! Handlers for member management.
//!
//! Member CRUD, ticket assignment, visit history, and a read-only view of
//! the member's current entitlement. All endpoints require authentication
//! via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gymdesk_core::entitlement::{self, EntitlementState};
use gymdesk_core::error::CoreError;
use gymdesk_core::member::{
    clamp_page, resolve_sort, total_pages, validate_gender, validate_name, validate_status,
};
use gymdesk_core::phone::{format_phone, validate_phone};
use gymdesk_core::ticket::{plan_assignment, MembershipType};
use gymdesk_core::types::{Date, DbId};
use gymdesk_db::models::attendance::AttendanceLog;
use gymdesk_db::models::member::{
    AssignTicket, CreateMember, Member, MemberFilter, MemberListPage, MemberListParams,
    UpdateMember,
};
use gymdesk_db::models::registration::Registration;
use gymdesk_db::repositories::attendance_repo::DEFAULT_HISTORY_LIMIT;
use gymdesk_db::repositories::{AttendanceRepo, MemberRepo, RegistrationRepo, TicketRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound for `?limit=` on visit history.
const MAX_HISTORY_LIMIT: i64 = 500;

fn member_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Member",
        id,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/members
///
/// Paged list with optional search (name or phone digits), status filter
/// and sort.
pub async fn list_members(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MemberListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let (sort_column, sort_dir) =
        resolve_sort(params.sort_by.as_deref(), params.sort_order.as_deref())?;
    let (page, limit, offset) = clamp_page(params.page, params.limit);

    let filter = MemberFilter {
        search: params.search.as_deref(),
        status: params.status.as_deref(),
        sort_column,
        sort_dir,
        limit,
        offset,
    };
    let (members, total) = MemberRepo::list(&state.pool, &filter).await?;

    Ok(Json(DataResponse {
        data: MemberListPage {
            members,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        },
    }))
}

/// POST /api/v1/members
///
/// Register a member. The phone is stored in canonical hyphenated form.
pub async fn create_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateMember>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_name(&input.name)?;
    validate_phone(&input.phone)?;
    if let Some(gender) = input.gender.as_deref() {
        validate_gender(gender)?;
    }
    if let Some(status) = input.status.as_deref() {
        validate_status(status)?;
    }
    input.phone = format_phone(&input.phone);

    let member = MemberRepo::create(&state.pool, &input).await?;

    tracing::info!(member_id = member.id, user = %auth.subject, "Member created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/v1/members/{id}
pub async fn get_member(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;

    Ok(Json(DataResponse { data: member }))
}

/// PUT /api/v1/members/{id}
///
/// Partial update. Provided fields get the same validation as on create.
pub async fn update_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateMember>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(name) = input.name.as_deref() {
        validate_name(name)?;
    }
    if let Some(phone) = input.phone.as_deref() {
        validate_phone(phone)?;
        input.phone = Some(format_phone(phone));
    }
    if let Some(Some(gender)) = input.gender.as_ref() {
        validate_gender(gender)?;
    }
    if let Some(status) = input.status.as_deref() {
        validate_status(status)?;
    }

    let member = MemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| member_not_found(id))?;

    tracing::info!(member_id = id, user = %auth.subject, "Member updated");

    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/members/{id}
///
/// Delete a member together with their registrations and visits.
pub async fn delete_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = MemberRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(member_not_found(id));
    }

    tracing::info!(member_id = id, user = %auth.subject, "Member deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// A member's ticket registrations and recent visits.
#[derive(Debug, Serialize)]
pub struct MemberHistory {
    pub registrations: Vec<Registration>,
    pub visits: Vec<AttendanceLog>,
}

/// GET /api/v1/members/{id}/history
///
/// Registrations and visits, newest first.
pub async fn member_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;

    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let registrations = RegistrationRepo::list_by_member(&state.pool, id).await?;
    let visits = AttendanceRepo::list_by_member(&state.pool, id, limit).await?;

    Ok(Json(DataResponse {
        data: MemberHistory {
            registrations,
            visits,
        },
    }))
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

/// POST /api/v1/members/{id}/ticket
///
/// Assign a catalog ticket, replacing the member's current ticket.
pub async fn assign_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTicket>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::find(&state.pool, &input.ticket_type)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Ticket",
                key: input.ticket_type.clone(),
            })
        })?;

    let start_date = input.start_date.unwrap_or_else(|| state.config.today());
    let plan = plan_assignment(ticket.count, ticket.duration_days, start_date)?;

    let member =
        MemberRepo::assign_ticket(&state.pool, id, &ticket.ticket_type, ticket.price, &plan)
            .await?
            .ok_or_else(|| member_not_found(id))?;

    tracing::info!(
        member_id = id,
        ticket_type = %ticket.ticket_type,
        start_date = %plan.start_date,
        end_date = ?plan.end_date,
        remain_count = ?plan.remain_count,
        user = %auth.subject,
        "Ticket assigned",
    );

    Ok(Json(DataResponse { data: member }))
}

/// Read-only entitlement view for the member detail screen.
#[derive(Debug, Serialize)]
pub struct MemberEntitlement {
    pub member_id: DbId,
    pub as_of: Date,
    pub ticket_type: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub remain_count: Option<i32>,
    /// `None` when the member holds no ticket.
    pub membership_type: Option<MembershipType>,
    pub entitlement: EntitlementState,
}

impl MemberEntitlement {
    fn resolve(member: &Member, today: Date) -> Self {
        let snapshot = member.snapshot();
        let state = entitlement::resolve(&snapshot.ticket(), today);
        Self {
            member_id: member.id,
            as_of: today,
            ticket_type: member.ticket_type.clone(),
            start_date: member.start_date,
            end_date: member.end_date,
            remain_count: member.remain_count,
            membership_type: member
                .ticket_type
                .as_ref()
                .map(|_| MembershipType::classify(member.end_date, member.remain_count)),
            entitlement: state,
        }
    }
}

/// GET /api/v1/members/{id}/entitlement
pub async fn member_entitlement(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;

    Ok(Json(DataResponse {
        data: MemberEntitlement::resolve(&member, state.config.today()),
    }))
}
