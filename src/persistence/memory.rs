use super::{PersistenceError, TaskBackend};
use crate::domain::{NewTask, Task, TaskId, TaskPatch};
use uuid::Uuid;

/// Task backend kept in memory, with switchable failures
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    tasks: Vec<Task>,
    failing: bool,
    fail_after: Option<usize>,
    calls: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Seed with existing rows
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    #[cfg(test)]
    /// Make every following call fail until switched off again
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    #[cfg(test)]
    /// Let `calls` more calls through, then fail every one after them
    pub fn fail_after(&mut self, calls: usize) {
        self.fail_after = Some(calls);
    }

    #[cfg(test)]
    /// Number of calls received, failed ones included
    pub fn calls(&self) -> usize {
        self.calls
    }

    #[cfg(test)]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn enter(&mut self, op: &str) -> Result<(), PersistenceError> {
        self.calls += 1;
        match self.fail_after {
            Some(0) => return Err(PersistenceError::Rejected(op.to_string())),
            Some(left) => self.fail_after = Some(left - 1),
            None => {}
        }
        if self.failing {
            return Err(PersistenceError::Rejected(op.to_string()));
        }
        Ok(())
    }
}

impl TaskBackend for MemoryBackend {
    fn list_tasks(&mut self, owner_id: &str) -> Result<Vec<Task>, PersistenceError> {
        self.enter("list")?;
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn create_task(&mut self, owner_id: &str, task: NewTask) -> Result<Task, PersistenceError> {
        self.enter("create")?;
        let task = task.into_task(Uuid::new_v4(), owner_id);
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, PersistenceError> {
        self.enter("update")?;
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PersistenceError::NotFound(id))?;
        task.apply_patch(patch);
        Ok(task.clone())
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), PersistenceError> {
        self.enter("delete")?;
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(PersistenceError::NotFound(id));
        }
        Ok(())
    }
}
