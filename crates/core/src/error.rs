use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by natural key, e.g. a ticket type name.
    #[error("Entity not found: {entity} '{key}'")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    /// Flatten field errors into a single `field: message` list.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: invalid ({})", e.code),
                })
            })
            .collect();
        parts.sort();
        CoreError::Validation(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "too short"))]
        name: String,
        #[validate(range(min = 0))]
        price: i64,
    }

    #[test]
    fn validation_errors_flatten_into_sorted_message() {
        let sample = Sample {
            name: "a".into(),
            price: -1,
        };
        let err: CoreError = sample.validate().unwrap_err().into();
        match err {
            CoreError::Validation(msg) => {
                assert_eq!(msg, "name: too short; price: invalid (range)");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn not_found_display() {
        let err = CoreError::NotFound {
            entity: "Member",
            id: 7,
        };
        assert_eq!(err.to_string(), "Entity not found: Member with id 7");
    }
}
