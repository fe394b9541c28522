use crate::domain::{TaskId, ValidationError};
use crate::persistence::PersistenceError;
use thiserror::Error;

/// Failure of a task store operation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not save: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("no task with id {0}")]
    UnknownTask(TaskId),
}

impl StoreError {
    /// True when the input was rejected before reaching the backend
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
