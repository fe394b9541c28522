use super::{StoreError, TaskStore};
use crate::domain::{DeleteMode, Quadrant, Task, TaskFields, TaskId};
use crate::persistence::{settings::DEFAULT_UNDO_DEPTH, TaskBackend};

/// Where a task was before a delete or completion
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub task: Task,
    pub quadrant: Quadrant,
    pub index: usize,
    pub timestamp: i64,
}

/// Separate bounded stacks for deletions and completions
#[derive(Debug, Clone)]
pub struct UndoHistory {
    deletes: Vec<UndoEntry>,
    completes: Vec<UndoEntry>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

impl UndoHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            deletes: Vec::new(),
            completes: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn delete_depth(&self) -> usize {
        self.deletes.len()
    }

    pub fn complete_depth(&self) -> usize {
        self.completes.len()
    }

    /// Delete a task, remembering it for `undo_delete`
    pub fn delete_task<B: TaskBackend>(
        &mut self,
        store: &mut TaskStore<B>,
        id: TaskId,
        now: i64,
    ) -> Result<(), StoreError> {
        let entry = snapshot(store, id, now)?;
        store.remove(id)?;
        push_bounded(&mut self.deletes, entry, self.limit);
        Ok(())
    }

    /// Mark a task completed. Only a pending task leaves an undo entry.
    pub fn complete_task<B: TaskBackend>(
        &mut self,
        store: &mut TaskStore<B>,
        id: TaskId,
        now: i64,
    ) -> Result<Task, StoreError> {
        let entry = snapshot(store, id, now)?;
        if entry.task.completed {
            return Ok(entry.task);
        }
        let task = store.set_completed(id, true)?;
        push_bounded(&mut self.completes, entry, self.limit);
        Ok(task)
    }

    /// Bring back the most recently deleted task. With soft deletes the task
    /// keeps its id and position; after a hard delete a copy is re-created
    /// from the snapshot, losing progress and time records.
    pub fn undo_delete<B: TaskBackend>(
        &mut self,
        store: &mut TaskStore<B>,
        now: i64,
    ) -> Result<Option<Task>, StoreError> {
        let Some(entry) = self.deletes.pop() else {
            return Ok(None);
        };

        let result = match store.delete_mode() {
            DeleteMode::Soft => store.restore(&entry.task, entry.quadrant, entry.index),
            DeleteMode::Hard => store.add(
                entry.quadrant,
                &entry.task.text,
                TaskFields::from_task(&entry.task),
                now,
            ),
        };

        match result {
            Ok(task) => {
                log::debug!(
                    "undid delete of {} (deleted at {})",
                    entry.task.id, entry.timestamp
                );
                Ok(Some(task))
            }
            Err(e) => {
                self.deletes.push(entry);
                Err(e)
            }
        }
    }

    /// Reopen the most recently completed task. Entries whose task is gone
    /// are dropped.
    pub fn undo_complete<B: TaskBackend>(
        &mut self,
        store: &mut TaskStore<B>,
    ) -> Result<Option<Task>, StoreError> {
        let Some(entry) = self.completes.pop() else {
            return Ok(None);
        };
        if store.get(entry.task.id).is_none() {
            log::debug!("dropping undo entry for missing task {}", entry.task.id);
            return Ok(None);
        }

        match store.set_completed(entry.task.id, false) {
            Ok(task) => Ok(Some(task)),
            Err(e) => {
                self.completes.push(entry);
                Err(e)
            }
        }
    }
}

fn snapshot<B: TaskBackend>(
    store: &TaskStore<B>,
    id: TaskId,
    now: i64,
) -> Result<UndoEntry, StoreError> {
    let (quadrant, index) = store.locate(id).ok_or(StoreError::UnknownTask(id))?;
    let task = store.bucket(quadrant)[index].clone();
    Ok(UndoEntry {
        task,
        quadrant,
        index,
        timestamp: now,
    })
}

fn push_bounded(stack: &mut Vec<UndoEntry>, entry: UndoEntry, limit: usize) {
    stack.push(entry);
    if stack.len() > limit {
        stack.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;
    use pretty_assertions::assert_eq;

    const NOW: i64 = 1_700_000_000_000;

    fn store_with(mode: DeleteMode, texts: &[&str]) -> (TaskStore<MemoryBackend>, Vec<Task>) {
        let mut store = TaskStore::new(MemoryBackend::new(), "me", mode);
        let tasks = texts
            .iter()
            .map(|text| {
                store
                    .add(Quadrant::Q1, text, TaskFields::default(), NOW)
                    .unwrap()
            })
            .collect();
        (store, tasks)
    }

    fn texts(store: &TaskStore<MemoryBackend>) -> Vec<String> {
        store
            .bucket(Quadrant::Q1)
            .iter()
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn test_complete_then_undo() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["Pay bills"]);
        let mut history = UndoHistory::default();

        let done = history.complete_task(&mut store, tasks[0].id, NOW).unwrap();
        assert!(done.completed);
        assert_eq!(history.complete_depth(), 1);

        let reopened = history.undo_complete(&mut store).unwrap().unwrap();
        assert!(!reopened.completed);
        assert!(!store.get(tasks[0].id).unwrap().completed);
        assert_eq!(history.complete_depth(), 0);
    }

    #[test]
    fn test_completing_completed_task_pushes_nothing() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["Done already"]);
        store.set_completed(tasks[0].id, true).unwrap();
        let mut history = UndoHistory::default();

        history.complete_task(&mut store, tasks[0].id, NOW).unwrap();
        assert_eq!(history.complete_depth(), 0);
    }

    #[test]
    fn test_soft_undo_delete_keeps_id_and_position() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["a", "b", "c"]);
        let mut history = UndoHistory::default();

        history.delete_task(&mut store, tasks[1].id, NOW).unwrap();
        assert_eq!(texts(&store), vec!["a", "c"]);

        let restored = history.undo_delete(&mut store, NOW).unwrap().unwrap();
        assert_eq!(restored.id, tasks[1].id);
        assert_eq!(texts(&store), vec!["a", "b", "c"]);
        assert_eq!(store.locate(tasks[1].id), Some((Quadrant::Q1, 1)));
        assert_eq!(history.delete_depth(), 0);
    }

    #[test]
    fn test_hard_undo_delete_recreates() {
        let (mut store, tasks) = store_with(DeleteMode::Hard, &["a", "b"]);
        let mut history = UndoHistory::default();
        store.update(tasks[0].id, crate::domain::TaskPatch::progress(60)).unwrap();

        history.delete_task(&mut store, tasks[0].id, NOW).unwrap();
        let recreated = history.undo_delete(&mut store, NOW + 1).unwrap().unwrap();

        assert_ne!(recreated.id, tasks[0].id);
        assert_eq!(recreated.text, "a");
        assert_eq!(recreated.quadrant, Quadrant::Q1);
        assert_eq!(recreated.progress, 0);
        assert_eq!(texts(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let (mut store, _) = store_with(DeleteMode::Soft, &[]);
        let mut history = UndoHistory::default();
        assert_eq!(history.undo_delete(&mut store, NOW).unwrap(), None);
        assert_eq!(history.undo_complete(&mut store).unwrap(), None);
        assert_eq!(store.backend().calls(), 0);
    }

    #[test]
    fn test_failed_delete_leaves_no_entry() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["a"]);
        let mut history = UndoHistory::default();
        store.backend_mut().set_failing(true);

        assert!(history.delete_task(&mut store, tasks[0].id, NOW).is_err());
        assert!(history.complete_task(&mut store, tasks[0].id, NOW).is_err());
        assert_eq!(history.delete_depth(), 0);
        assert_eq!(history.complete_depth(), 0);
        assert_eq!(texts(&store), vec!["a"]);
    }

    #[test]
    fn test_failed_delete_keeps_full_stack() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["a", "b", "c"]);
        let mut history = UndoHistory::new(1);
        history.delete_task(&mut store, tasks[0].id, NOW).unwrap();
        history.complete_task(&mut store, tasks[1].id, NOW).unwrap();

        store.backend_mut().set_failing(true);
        assert!(history.delete_task(&mut store, tasks[2].id, NOW).is_err());
        assert!(history.complete_task(&mut store, tasks[2].id, NOW).is_err());
        assert_eq!(history.delete_depth(), 1);
        assert_eq!(history.complete_depth(), 1);
        store.backend_mut().set_failing(false);

        let restored = history.undo_delete(&mut store, NOW).unwrap().unwrap();
        assert_eq!(restored.id, tasks[0].id);
        let reopened = history.undo_complete(&mut store).unwrap().unwrap();
        assert_eq!(reopened.id, tasks[1].id);
    }

    #[test]
    fn test_failed_undo_can_be_retried() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["a"]);
        let mut history = UndoHistory::default();
        history.delete_task(&mut store, tasks[0].id, NOW).unwrap();

        store.backend_mut().set_failing(true);
        assert!(history.undo_delete(&mut store, NOW).is_err());
        assert_eq!(history.delete_depth(), 1);

        store.backend_mut().set_failing(false);
        assert!(history.undo_delete(&mut store, NOW).unwrap().is_some());
        assert_eq!(texts(&store), vec!["a"]);
    }

    #[test]
    fn test_undo_complete_drops_missing_task() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["a"]);
        let mut history = UndoHistory::default();
        history.complete_task(&mut store, tasks[0].id, NOW).unwrap();
        store.remove(tasks[0].id).unwrap();

        assert_eq!(history.undo_complete(&mut store).unwrap(), None);
        assert_eq!(history.complete_depth(), 0);
    }

    #[test]
    fn test_depth_is_bounded() {
        let (mut store, tasks) = store_with(DeleteMode::Soft, &["a", "b", "c"]);
        let mut history = UndoHistory::new(2);
        for task in &tasks {
            history.delete_task(&mut store, task.id, NOW).unwrap();
        }
        assert_eq!(history.delete_depth(), 2);

        // The oldest entry ("a") was dropped
        history.undo_delete(&mut store, NOW).unwrap();
        history.undo_delete(&mut store, NOW).unwrap();
        assert_eq!(history.undo_delete(&mut store, NOW).unwrap(), None);
        assert_eq!(texts(&store), vec!["b", "c"]);
    }
}
