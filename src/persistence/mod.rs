pub mod files;
pub mod json_backend;
pub mod memory;
pub mod settings;

pub use files::{
    atomic_write, ensure_data_dir, init_local_data_dir, log_file, meta_file, tasks_file,
};
pub use json_backend::JsonBackend;
pub use memory::MemoryBackend;
pub use settings::{load_or_init_settings, save_settings, Settings, UserProfile};

use crate::domain::{NewTask, Task, TaskId, TaskPatch};
use thiserror::Error;

/// Failure reported by a task backend
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
    #[error("malformed task data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("task {0} not found")]
    NotFound(TaskId),
    #[error("backend rejected {0}")]
    Rejected(String),
}

/// The CRUD contract every task store talks to
pub trait TaskBackend {
    /// Every task of `owner_id`, including soft-deleted ones
    fn list_tasks(&mut self, owner_id: &str) -> Result<Vec<Task>, PersistenceError>;

    /// Insert a task; the backend assigns its id
    fn create_task(&mut self, owner_id: &str, task: NewTask) -> Result<Task, PersistenceError>;

    /// Merge a normalized patch and return the stored result
    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, PersistenceError>;

    fn delete_task(&mut self, id: TaskId) -> Result<(), PersistenceError>;
}

impl<B: TaskBackend + ?Sized> TaskBackend for Box<B> {
    fn list_tasks(&mut self, owner_id: &str) -> Result<Vec<Task>, PersistenceError> {
        (**self).list_tasks(owner_id)
    }

    fn create_task(&mut self, owner_id: &str, task: NewTask) -> Result<Task, PersistenceError> {
        (**self).create_task(owner_id, task)
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, PersistenceError> {
        (**self).update_task(id, patch)
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), PersistenceError> {
        (**self).delete_task(id)
    }
}
