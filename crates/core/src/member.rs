//! Member status, gender, and list-query constants and validators.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_PAUSED: &str = "PAUSED";
pub const STATUS_EXPIRED: &str = "EXPIRED";
pub const STATUS_WITHDRAWN: &str = "WITHDRAWN";

/// All valid member status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_ACTIVE,
    STATUS_PAUSED,
    STATUS_EXPIRED,
    STATUS_WITHDRAWN,
];

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// All valid gender values.
pub const VALID_GENDERS: &[&str] = &["M", "F", "OTHER"];

// ---------------------------------------------------------------------------
// List queries
// ---------------------------------------------------------------------------

/// Columns a member list may be sorted by.
pub const VALID_SORT_COLUMNS: &[&str] = &["created_at", "last_visit_date", "end_date"];

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum member name length (in characters).
pub const MIN_NAME_CHARS: usize = 2;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that `status` is one of the allowed values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate that `gender` is one of the allowed values.
pub fn validate_gender(gender: &str) -> Result<(), CoreError> {
    if VALID_GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid gender '{gender}'. Must be one of: {}",
            VALID_GENDERS.join(", ")
        )))
    }
}

/// Validate a member name: at least [`MIN_NAME_CHARS`] characters after trimming.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().chars().count() < MIN_NAME_CHARS {
        return Err(CoreError::Validation(format!(
            "Member name must be at least {MIN_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

/// Resolve the SQL sort column and direction for a member list.
///
/// Unknown columns are rejected; direction defaults to descending.
pub fn resolve_sort(
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> Result<(&'static str, &'static str), CoreError> {
    let column = match sort_by {
        None => "created_at",
        Some(s) => VALID_SORT_COLUMNS
            .iter()
            .copied()
            .find(|c| *c == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid sort_by '{s}'. Must be one of: {}",
                    VALID_SORT_COLUMNS.join(", ")
                ))
            })?,
    };
    let direction = match sort_order {
        None | Some("desc") => "DESC",
        Some("asc") => "ASC",
        Some(other) => {
            return Err(CoreError::Validation(format!(
                "Invalid sort_order '{other}'. Must be 'asc' or 'desc'"
            )))
        }
    };
    Ok((column, direction))
}

/// Clamp a 1-based page and page size, returning `(page, limit, offset)`.
/// The offset saturates, so an absurd page number yields an empty page.
pub fn clamp_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit, (page - 1).saturating_mul(limit))
}

/// Number of pages needed for `total` rows at `limit` rows per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_validate() {
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("active").is_err());
    }

    #[test]
    fn genders_validate() {
        assert!(validate_gender("F").is_ok());
        assert!(validate_gender("X").is_err());
    }

    #[test]
    fn name_requires_two_chars() {
        assert!(validate_name("Kim").is_ok());
        assert!(validate_name(" K ").is_err());
        // Multi-byte names count characters, not bytes.
        assert!(validate_name("홍").is_err());
        assert!(validate_name("홍길").is_ok());
    }

    #[test]
    fn sort_defaults_to_created_at_desc() {
        assert_eq!(resolve_sort(None, None).unwrap(), ("created_at", "DESC"));
    }

    #[test]
    fn sort_accepts_known_columns() {
        assert_eq!(
            resolve_sort(Some("end_date"), Some("asc")).unwrap(),
            ("end_date", "ASC")
        );
    }

    #[test]
    fn sort_rejects_unknown_column_and_order() {
        assert!(resolve_sort(Some("phone; DROP TABLE members"), None).is_err());
        assert!(resolve_sort(None, Some("sideways")).is_err());
    }

    #[test]
    fn clamp_page_defaults() {
        assert_eq!(clamp_page(None, None), (1, 10, 0));
    }

    #[test]
    fn clamp_page_bounds() {
        assert_eq!(clamp_page(Some(0), Some(1000)), (1, 100, 0));
        assert_eq!(clamp_page(Some(3), Some(20)), (3, 20, 40));
    }

    #[test]
    fn clamp_page_huge_page_saturates_offset() {
        assert_eq!(
            clamp_page(Some(i64::MAX), Some(100)),
            (i64::MAX, 100, i64::MAX)
        );
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
