//! Ticket catalog model and DTOs.

use gymdesk_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::double_option;

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub ticket_type: String,
    pub count: Option<i32>,
    pub duration_days: Option<i32>,
    pub price: i64,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a catalog entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTicket {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub ticket_type: String,
    pub count: Option<i32>,
    pub duration_days: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: i64,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// DTO for patching a catalog entry. `count`, `duration_days` and
/// `description` accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTicket {
    #[serde(default, deserialize_with = "double_option")]
    pub count: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration_days: Option<Option<i32>>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl UpdateTicket {
    /// Merge this patch over `current`, returning `(count, duration_days, price, description)`.
    pub fn merged(&self, current: &Ticket) -> (Option<i32>, Option<i32>, i64, Option<String>) {
        (
            self.count.unwrap_or(current.count),
            self.duration_days.unwrap_or(current.duration_days),
            self.price.unwrap_or(current.price),
            self.description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
        )
    }
}

/// Catalog listing envelope.
#[derive(Debug, Clone, Serialize)]
pub struct TicketList {
    pub tickets: Vec<Ticket>,
    pub total: usize,
}

/// Impact preview shown before deleting a catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDeleteInfo {
    pub ticket_type: String,
    pub affected_member_count: i64,
}
