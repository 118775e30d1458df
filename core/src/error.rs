use thiserror::Error;

/// Domain failures raised through `anyhow`.
///
/// Callers that need to tell these apart use
/// `err.downcast_ref::<TrackerError>()`.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("No profile set. Use `tally profile set` to create one")]
    NoProfile,

    #[error("{0}")]
    Validation(String),

    #[error("Malformed food data: {0}")]
    MalformedExternalData(String),
}

impl TrackerError {
    #[must_use]
    pub fn meal_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Meal entry", id }
    }

    #[must_use]
    pub fn exercise_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Exercise entry",
            id,
        }
    }
}

/// True when `err` carries a [`TrackerError::NotFound`].
#[must_use]
pub fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<TrackerError>(),
        Some(TrackerError::NotFound { .. })
    )
}
