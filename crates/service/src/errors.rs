use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid parent: {0}")]
    InvalidParent(String),
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),
    #[error("parent not found: {0}")]
    ParentNotFound(u64),
    #[error("storage error: {0}")]
    Storage(String),
}

// Field-level validation failures all surface as the InvalidParent kind.
impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::InvalidParent(msg),
        }
    }
}
