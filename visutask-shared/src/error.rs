//! Domain error taxonomy shared by the guard, the position engine and the
//! tag association manager.
//!
//! Callers never learn whether a resource is missing or merely belongs to a
//! different parent: both surface as [`BoardError::NotFound`]. `Forbidden` is
//! reserved for resources that resolve completely but belong to another user,
//! or for structural changes to an inbox.

use uuid::Uuid;

/// Result alias for board operations
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors produced by board, list, card and tag operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Resource missing or scope-inconsistent
    #[error("{0} not found")]
    NotFound(String),

    /// Resource owned by another user, or inbox-protected
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested card position lies outside the valid range
    #[error("Position {position} is out of range ({min}..={max})")]
    InvalidPosition { position: i32, min: i32, max: i32 },

    /// Malformed input that passed deserialization
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Concurrent modification could not be resolved
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BoardError {
    /// Builds a `NotFound` naming the resource kind only
    pub fn not_found(resource: &str) -> Self {
        BoardError::NotFound(resource.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        BoardError::Forbidden(message.into())
    }

    /// Logs the resource id at debug level and returns a `NotFound` without it
    pub fn missing(resource: &str, id: Uuid) -> Self {
        tracing::debug!(resource, %id, "Resource lookup failed");
        Self::not_found(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(BoardError::not_found("Card").to_string(), "Card not found");

        let err = BoardError::InvalidPosition {
            position: 0,
            min: 1,
            max: 3,
        };
        assert_eq!(err.to_string(), "Position 0 is out of range (1..=3)");

        let err = BoardError::forbidden("The inbox cannot be deleted.");
        assert!(err.to_string().contains("inbox"));
    }

    #[test]
    fn test_missing_hides_identifier() {
        let id = Uuid::new_v4();
        let err = BoardError::missing("List", id);
        assert!(!err.to_string().contains(&id.to_string()));
    }
}
