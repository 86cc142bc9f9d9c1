//! Repository for the `members` table.
//!
//! Member CRUD, the paged list with search and sort, and ticket
//! assignment (member snapshot plus a `registrations` row in one
//! transaction).

use gymdesk_core::phone::normalize_phone;
use gymdesk_core::ticket::PlannedAssignment;
use gymdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member, MemberFilter, UpdateMember};

/// Column list for `members` queries.
pub(crate) const COLUMNS: &str = "\
    id, name, phone, email, birth_date, gender, status, memo, emergency_contact, \
    ticket_type, start_date, end_date, remain_count, visit_count, last_visit_date, \
    created_at, updated_at";

/// Provides CRUD operations for members.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a member. `input.phone` must already be in display form.
    ///
    /// A duplicate phone violates `uq_members_phone_digits`.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members \
                (name, phone, email, birth_date, gender, status, memo, emergency_contact) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'ACTIVE'), $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(input.name.trim())
            .bind(&input.phone)
            .bind(input.email.as_deref())
            .bind(input.birth_date)
            .bind(input.gender.as_deref())
            .bind(input.status.as_deref())
            .bind(input.memo.as_deref())
            .bind(input.emergency_contact.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look a member up by phone, ignoring formatting.
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<Member>, sqlx::Error> {
        let digits = normalize_phone(phone);
        if digits.is_empty() {
            return Ok(None);
        }
        let query = format!("SELECT {COLUMNS} FROM members WHERE phone_digits = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(digits)
            .fetch_optional(pool)
            .await
    }

    /// One page of members matching the filter, plus the total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &MemberFilter<'_>,
    ) -> Result<(Vec<Member>, i64), sqlx::Error> {
        let search = filter.search.map(str::trim).filter(|s| !s.is_empty());
        let search_digits = search.map(normalize_phone).filter(|d| !d.is_empty());

        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if search.is_some() {
            if search_digits.is_some() {
                conditions.push(format!(
                    "(name ILIKE ${bind_idx} OR phone_digits LIKE ${})",
                    bind_idx + 1
                ));
                bind_idx += 2;
            } else {
                conditions.push(format!("name ILIKE ${bind_idx}"));
                bind_idx += 1;
            }
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM members {where_clause}");
        let list_query = format!(
            "SELECT {COLUMNS} FROM members {where_clause} \
             ORDER BY {column} {dir} NULLS LAST, id {dir} \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            column = filter.sort_column,
            dir = filter.sort_dir,
            next_idx = bind_idx + 1,
        );

        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query);
        let mut list_q = sqlx::query_as::<_, Member>(&list_query);

        // Bind dynamic parameters in order.
        if let Some(term) = search {
            let pattern = format!("%{term}%");
            count_q = count_q.bind(pattern.clone());
            list_q = list_q.bind(pattern);
            if let Some(ref digits) = search_digits {
                let pattern = format!("%{digits}%");
                count_q = count_q.bind(pattern.clone());
                list_q = list_q.bind(pattern);
            }
        }
        if let Some(status) = filter.status {
            count_q = count_q.bind(status);
            list_q = list_q.bind(status);
        }

        let total = count_q.fetch_one(pool).await?;
        let members = list_q
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?;
        Ok((members, total))
    }

    /// Patch a member's profile. Returns `None` if no member has the ID.
    ///
    /// `input.phone`, when present, must already be in display form.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                status = COALESCE($4, status), \
                email = CASE WHEN $5 THEN $6 ELSE email END, \
                birth_date = CASE WHEN $7 THEN $8 ELSE birth_date END, \
                gender = CASE WHEN $9 THEN $10 ELSE gender END, \
                memo = CASE WHEN $11 THEN $12 ELSE memo END, \
                emergency_contact = CASE WHEN $13 THEN $14 ELSE emergency_contact END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.phone.as_deref())
            .bind(input.status.as_deref())
            .bind(input.email.is_some())
            .bind(input.email.clone().flatten())
            .bind(input.birth_date.is_some())
            .bind(input.birth_date.flatten())
            .bind(input.gender.is_some())
            .bind(input.gender.clone().flatten())
            .bind(input.memo.is_some())
            .bind(input.memo.clone().flatten())
            .bind(input.emergency_contact.is_some())
            .bind(input.emergency_contact.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a member and, by cascade, their history.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a member's ticket snapshot and append a registration row.
    ///
    /// Returns `None` (and writes nothing) if no member has the ID.
    pub async fn assign_ticket(
        pool: &PgPool,
        id: DbId,
        ticket_type: &str,
        price: i64,
        plan: &PlannedAssignment,
    ) -> Result<Option<Member>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE members SET \
                ticket_type = $2, start_date = $3, end_date = $4, remain_count = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(ticket_type)
            .bind(plan.start_date)
            .bind(plan.end_date)
            .bind(plan.remain_count)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(member) = member else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO registrations (member_id, ticket_type, start_date, end_date, price) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(ticket_type)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(price)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(member))
    }
}
