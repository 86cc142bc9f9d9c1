//! Repository for the `tickets` catalog table.

use sqlx::PgPool;

use crate::models::ticket::{CreateTicket, Ticket};

/// Column list for `tickets` queries.
const COLUMNS: &str =
    "ticket_type, count, duration_days, price, description, created_at, updated_at";

/// Provides CRUD operations for the ticket catalog.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a catalog entry.
    ///
    /// Returns `None` if an entry with the same `ticket_type` already exists.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (ticket_type, count, duration_days, price, description) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (ticket_type) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.ticket_type.trim())
            .bind(input.count)
            .bind(input.duration_days)
            .bind(input.price)
            .bind(input.description.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// All catalog entries, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets ORDER BY ticket_type");
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }

    pub async fn find(pool: &PgPool, ticket_type: &str) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE ticket_type = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_type)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the mutable fields with already-merged values.
    ///
    /// Returns `None` if the entry does not exist.
    pub async fn update(
        pool: &PgPool,
        ticket_type: &str,
        count: Option<i32>,
        duration_days: Option<i32>,
        price: i64,
        description: Option<&str>,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET \
                count = $2, duration_days = $3, price = $4, description = $5 \
             WHERE ticket_type = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_type)
            .bind(count)
            .bind(duration_days)
            .bind(price)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a catalog entry. Members holding it keep their snapshot.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, ticket_type: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE ticket_type = $1")
            .bind(ticket_type)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of members whose current ticket is `ticket_type`.
    pub async fn count_members_using(pool: &PgPool, ticket_type: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members WHERE ticket_type = $1")
            .bind(ticket_type)
            .fetch_one(pool)
            .await
    }
}
