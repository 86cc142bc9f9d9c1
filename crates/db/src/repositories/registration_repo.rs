//! Repository for the `registrations` history table.
//!
//! Rows are written by [`super::MemberRepo::assign_ticket`]; this
//! repository only reads them.

use gymdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::registration::Registration;

const COLUMNS: &str = "id, member_id, ticket_type, start_date, end_date, price, created_at";

pub struct RegistrationRepo;

impl RegistrationRepo {
    /// A member's ticket history, newest first.
    pub async fn list_by_member(
        pool: &PgPool,
        member_id: DbId,
    ) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM registrations \
             WHERE member_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
    }
}
