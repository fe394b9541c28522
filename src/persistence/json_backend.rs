use super::files::{atomic_write, read_file};
use super::{PersistenceError, TaskBackend};
use crate::domain::{NewTask, Task, TaskId, TaskPatch};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// On-disk layout of tasks.json
#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Task backend over a single JSON file. Every call reads the file fresh
/// and writes it back atomically, so the file is always authoritative.
#[derive(Debug, Clone)]
pub struct JsonBackend {
    path: PathBuf,
}

impl JsonBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<TaskFile, PersistenceError> {
        let content = read_file(&self.path)?;
        if content.trim().is_empty() {
            return Ok(TaskFile::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, file: &TaskFile) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(file)?;
        atomic_write(&self.path, &json)?;
        Ok(())
    }
}

impl TaskBackend for JsonBackend {
    fn list_tasks(&mut self, owner_id: &str) -> Result<Vec<Task>, PersistenceError> {
        let file = self.read()?;
        Ok(file
            .tasks
            .into_iter()
            .filter(|t| t.owner_id == owner_id)
            .collect())
    }

    fn create_task(&mut self, owner_id: &str, task: NewTask) -> Result<Task, PersistenceError> {
        let mut file = self.read()?;
        let task = task.into_task(Uuid::new_v4(), owner_id);
        file.tasks.push(task.clone());
        self.write(&file)?;
        Ok(task)
    }

    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, PersistenceError> {
        let mut file = self.read()?;
        let task = file
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PersistenceError::NotFound(id))?;
        task.apply_patch(patch);
        let updated = task.clone();
        self.write(&file)?;
        Ok(updated)
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), PersistenceError> {
        let mut file = self.read()?;
        let before = file.tasks.len();
        file.tasks.retain(|t| t.id != id);
        if file.tasks.len() == before {
            return Err(PersistenceError::NotFound(id));
        }
        self.write(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeadlineSpec, Quadrant, TaskFields};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn new_task(text: &str) -> NewTask {
        NewTask {
            quadrant: Quadrant::Q2,
            text: text.to_string(),
            created_at: 1_700_000_000_000,
            fields: TaskFields {
                deadline: Some(DeadlineSpec::Days(3)),
                ..TaskFields::default()
            },
        }
    }

    #[test]
    fn test_missing_file_lists_nothing() {
        let temp_dir = tempdir().unwrap();
        let mut backend = JsonBackend::new(temp_dir.path().join("tasks.json"));
        assert!(backend.list_tasks("me").unwrap().is_empty());
    }

    #[test]
    fn test_create_update_survive_reopen() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let mut backend = JsonBackend::new(&path);
        let created = backend.create_task("me", new_task("Write report")).unwrap();
        backend.create_task("someone-else", new_task("Not mine")).unwrap();
        let updated = backend
            .update_task(created.id, &TaskPatch::progress(40))
            .unwrap();
        assert_eq!(updated.progress, 40);

        let mut reopened = JsonBackend::new(&path);
        let tasks = reopened.list_tasks("me").unwrap();
        assert_eq!(tasks, vec![updated]);
    }

    #[test]
    fn test_delete_and_missing_ids() {
        let temp_dir = tempdir().unwrap();
        let mut backend = JsonBackend::new(temp_dir.path().join("tasks.json"));
        let task = backend.create_task("me", new_task("Gone soon")).unwrap();

        backend.delete_task(task.id).unwrap();
        assert!(backend.list_tasks("me").unwrap().is_empty());
        assert!(matches!(
            backend.delete_task(task.id),
            Err(PersistenceError::NotFound(_))
        ));
        assert!(matches!(
            backend.update_task(task.id, &TaskPatch::completed(true)),
            Err(PersistenceError::NotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut backend = JsonBackend::new(&path);
        assert!(matches!(
            backend.list_tasks("me"),
            Err(PersistenceError::Json(_))
        ));
    }
}
