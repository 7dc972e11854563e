use thiserror::Error;

/// Error type for saved-view operations.
///
/// `Validation` and `NotFound` reject a single operation; nothing in this
/// enum is fatal to the manager itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("saved view not found: {id}")]
    NotFound { id: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },
}

impl ViewError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        ViewError::Validation {
            reason: reason.into(),
        }
    }
}

/// Error type for key-value store backends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("io error: {reason}")]
    Io { reason: String },

    #[error("backend error: {reason}")]
    Backend { reason: String },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<StoreError> for ViewError {
    fn from(err: StoreError) -> Self {
        ViewError::Storage {
            reason: err.to_string(),
        }
    }
}
