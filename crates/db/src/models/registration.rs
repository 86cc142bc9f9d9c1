//! Ticket registration history model.

use gymdesk_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
    pub member_id: DbId,
    pub ticket_type: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub price: i64,
    pub created_at: Timestamp,
}
