//! Shared query parameter types for API handlers.

use gymdesk_core::types::Date;
use serde::Deserialize;

/// Optional `?date=YYYY-MM-DD`; handlers default to the current business day.
#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<Date>,
}

/// Optional `?limit=` for bounded history listings.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
