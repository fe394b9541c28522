//! The in-memory task collection, mirrored to a backend.
//!
//! Every mutation goes to the backend first; memory changes only once the
//! backend has confirmed, and takes the task the backend returned.

pub mod error;
pub mod undo;

pub use error::StoreError;
pub use undo::UndoHistory;

use crate::domain::{
    DeadlineSpec, DeleteMode, NewTask, Quadrant, Task, TaskFields, TaskId, TaskPatch,
    TimeRecord, ValidationError,
};
use crate::persistence::{PersistenceError, TaskBackend};

/// Tasks of one owner grouped by quadrant
pub struct TaskStore<B: TaskBackend> {
    owner_id: String,
    backend: B,
    buckets: [Vec<Task>; 4],
    delete_mode: DeleteMode,
}

impl<B: TaskBackend> TaskStore<B> {
    pub fn new(backend: B, owner_id: impl Into<String>, delete_mode: DeleteMode) -> Self {
        Self {
            owner_id: owner_id.into(),
            backend,
            buckets: Default::default(),
            delete_mode,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn buckets(&self) -> &[Vec<Task>; 4] {
        &self.buckets
    }

    pub fn bucket(&self, quadrant: Quadrant) -> &[Task] {
        &self.buckets[quadrant.index()]
    }

    /// Every task in memory, quadrant by quadrant
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.buckets.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.locate(id)
            .map(|(quadrant, index)| &self.buckets[quadrant.index()][index])
    }

    /// Quadrant and position of a task
    pub fn locate(&self, id: TaskId) -> Option<(Quadrant, usize)> {
        Quadrant::ALL.into_iter().find_map(|quadrant| {
            self.buckets[quadrant.index()]
                .iter()
                .position(|t| t.id == id)
                .map(|index| (quadrant, index))
        })
    }

    /// Replace memory with the owner's non-deleted tasks. Within a quadrant,
    /// tasks with a manual `order` come first by that order; the rest keep
    /// backend order. On failure the previous contents stay.
    pub fn load(&mut self, owner_id: &str) -> Result<(), StoreError> {
        let tasks = self
            .backend
            .list_tasks(owner_id)
            .map_err(|e| persistence_failed("load", None, e))?;

        let mut buckets: [Vec<Task>; 4] = Default::default();
        for task in tasks.into_iter().filter(|t| !t.deleted) {
            if task.time_records.iter().rev().skip(1).any(TimeRecord::is_open) {
                log::warn!("task {} has an open time record before its last", task.id);
            }
            buckets[task.quadrant.index()].push(task);
        }
        for bucket in &mut buckets {
            sort_bucket(bucket);
        }

        self.owner_id = owner_id.to_string();
        self.buckets = buckets;
        log::info!("loaded {} tasks for {}", self.len(), self.owner_id);
        Ok(())
    }

    /// Create a task at the end of `quadrant`
    pub fn add(
        &mut self,
        quadrant: Quadrant,
        text: &str,
        fields: TaskFields,
        now: i64,
    ) -> Result<Task, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        if let Some(DeadlineSpec::Days(0)) = fields.deadline {
            return Err(ValidationError::NonPositiveDays(0).into());
        }

        let new_task = NewTask {
            quadrant,
            text: text.to_string(),
            created_at: now,
            fields,
        };
        let task = self
            .backend
            .create_task(&self.owner_id, new_task)
            .map_err(|e| persistence_failed("create", None, e))?;

        log::debug!("added task {} to {}", task.id, task.quadrant);
        self.buckets[task.quadrant.index()].push(task.clone());
        Ok(task)
    }

    /// Merge `patch` into a task. Deadline forms stay exclusive: setting one
    /// clears the other, and a patch setting both keeps the date.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let current = self.get(id).ok_or(StoreError::UnknownTask(id))?;
        let mut patch = patch.normalized();
        patch.text = patch.text.map(|text| text.trim().to_string());
        patch.validate()?;
        if patch.is_empty() {
            return Ok(current.clone());
        }

        let updated = self
            .backend
            .update_task(id, &patch)
            .map_err(|e| persistence_failed("update", Some(id), e))?;

        log::debug!("updated task {}", id);
        self.apply_confirmed(updated.clone(), patch.order.is_some());
        Ok(updated)
    }

    /// Take a task out of every view; soft or hard per the delete mode
    pub fn remove(&mut self, id: TaskId) -> Result<(), StoreError> {
        let (quadrant, index) = self.locate(id).ok_or(StoreError::UnknownTask(id))?;

        match self.delete_mode {
            DeleteMode::Soft => {
                self.backend
                    .update_task(id, &TaskPatch::deleted(true))
                    .map_err(|e| persistence_failed("soft delete", Some(id), e))?;
            }
            DeleteMode::Hard => {
                self.backend
                    .delete_task(id)
                    .map_err(|e| persistence_failed("delete", Some(id), e))?;
            }
        }

        log::debug!("removed task {} ({:?})", id, self.delete_mode);
        self.buckets[quadrant.index()].remove(index);
        Ok(())
    }

    /// Reassign a task's quadrant; it lands at the end of the destination
    pub fn move_quadrant(&mut self, id: TaskId, quadrant: Quadrant) -> Result<Task, StoreError> {
        let current = self.get(id).ok_or(StoreError::UnknownTask(id))?;
        if current.quadrant == quadrant {
            return Ok(current.clone());
        }
        let patch = TaskPatch {
            quadrant: Some(quadrant),
            order: Some(None),
            ..TaskPatch::default()
        };
        self.update(id, patch)
    }

    /// Set the manual order of `quadrant` to `ids`, which must name exactly
    /// the tasks currently in it. Only tasks whose position changes are
    /// written.
    pub fn reorder(&mut self, quadrant: Quadrant, ids: &[TaskId]) -> Result<(), StoreError> {
        let bucket = &self.buckets[quadrant.index()];
        let mut expected: Vec<TaskId> = bucket.iter().map(|t| t.id).collect();
        let mut given = ids.to_vec();
        expected.sort();
        given.sort();
        if expected != given {
            return Err(ValidationError::ReorderMismatch(quadrant.to_string()).into());
        }

        for (position, id) in ids.iter().enumerate() {
            let order = position as i64;
            let unchanged = self.get(*id).is_some_and(|t| t.order == Some(order));
            if unchanged {
                continue;
            }
            let result = self
                .backend
                .update_task(*id, &TaskPatch::order(Some(order)))
                .map_err(|e| persistence_failed("reorder", Some(*id), e));
            match result {
                Ok(updated) => self.replace_in_place(updated),
                Err(e) => {
                    sort_bucket(&mut self.buckets[quadrant.index()]);
                    return Err(e);
                }
            }
        }

        let bucket = &mut self.buckets[quadrant.index()];
        bucket.sort_by_key(|t| ids.iter().position(|id| *id == t.id));
        log::debug!("reordered {} tasks in {}", ids.len(), quadrant);
        Ok(())
    }

    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<Task, StoreError> {
        self.update(id, TaskPatch::completed(completed))
    }

    /// Bring a soft-deleted task back at `index` of `quadrant` (clamped)
    pub fn restore(
        &mut self,
        snapshot: &Task,
        quadrant: Quadrant,
        index: usize,
    ) -> Result<Task, StoreError> {
        if let Some(existing) = self.get(snapshot.id) {
            return Ok(existing.clone());
        }

        let patch = TaskPatch {
            deleted: Some(false),
            quadrant: Some(quadrant),
            ..TaskPatch::default()
        };
        let restored = self
            .backend
            .update_task(snapshot.id, &patch)
            .map_err(|e| persistence_failed("restore", Some(snapshot.id), e))?;

        let bucket = &mut self.buckets[quadrant.index()];
        let index = index.min(bucket.len());
        bucket.insert(index, restored.clone());
        log::debug!("restored task {} to {}[{}]", restored.id, quadrant, index);
        Ok(restored)
    }

    fn apply_confirmed(&mut self, updated: Task, order_changed: bool) {
        let Some((quadrant, index)) = self.locate(updated.id) else {
            return;
        };
        if updated.deleted {
            self.buckets[quadrant.index()].remove(index);
        } else if updated.quadrant != quadrant {
            self.buckets[quadrant.index()].remove(index);
            self.buckets[updated.quadrant.index()].push(updated);
        } else {
            let bucket = &mut self.buckets[quadrant.index()];
            bucket[index] = updated;
            if order_changed {
                sort_bucket(bucket);
            }
        }
    }

    fn replace_in_place(&mut self, updated: Task) {
        if let Some((quadrant, index)) = self.locate(updated.id) {
            self.buckets[quadrant.index()][index] = updated;
        }
    }
}

/// Tasks with a manual order first, ascending; the rest keep their order
fn sort_bucket(bucket: &mut [Task]) {
    bucket.sort_by_key(|t| (t.order.is_none(), t.order.unwrap_or_default()));
}

fn persistence_failed(op: &str, id: Option<TaskId>, err: PersistenceError) -> StoreError {
    match id {
        Some(id) => log::warn!("{} of task {} failed: {}", op, id, err),
        None => log::warn!("{} failed: {}", op, err),
    }
    StoreError::Persistence(err)
}
