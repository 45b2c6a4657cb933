//! Storage error types.

/// Errors from the storage collaborator.
///
/// These are never retried by the core; they propagate to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An update targeted a record that was never saved.
    #[error("{entity} {id} does not exist")]
    MissingRecord { entity: &'static str, id: String },

    /// The backend refused or failed the operation.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn missing(entity: &'static str, id: impl ToString) -> Self {
        StoreError::MissingRecord {
            entity,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::missing("trip", "T4");
        assert_eq!(err.to_string(), "trip T4 does not exist");

        let err = StoreError::Backend("disk full".into());
        assert_eq!(err.to_string(), "storage backend failure: disk full");
    }
}
