use chrono::{NaiveDate, Utc};
use log::debug;

use crate::error::ValidationError;

use super::model::{Priority, PriorityDirection, Task, TaskId};

/// Owns every task record. All mutation goes through here, and each
/// mutating operation re-establishes the canonical order before
/// returning: due date ascending, priority descending within a date.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a task and returns its fresh id. Rejects an
    /// empty/whitespace description or a missing due date without
    /// touching the store.
    pub fn add(
        &mut self,
        description: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
    ) -> Result<TaskId, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let due_date = due_date.ok_or(ValidationError::MissingDueDate)?;

        let task = Task {
            id: TaskId::generate(),
            description: description.to_owned(),
            due_date,
            priority,
            completed: false,
            created_at: Utc::now(),
        };
        let id = task.id;
        debug!("added task {id} due {due_date} ({})", priority.as_str());

        self.tasks.push(task);
        self.resort();
        Ok(id)
    }

    /// Deletes the task if present; an unknown id is a no-op. Returns
    /// whether anything was removed.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        // Removal cannot break the sort order.
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Flips `completed` and returns the new value; `None` for an
    /// unknown id. Ordering ignores completion, so no re-sort here.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Moves priority one step along low -> medium -> high, clamped at
    /// both ends. Returns the resulting priority; `None` for an unknown
    /// id. Re-sorts since priority breaks due-date ties.
    pub fn change_priority(&mut self, id: TaskId, direction: PriorityDirection) -> Option<Priority> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.priority = match direction {
            PriorityDirection::Increase => task.priority.increased(),
            PriorityDirection::Decrease => task.priority.decreased(),
        };
        let priority = task.priority;
        self.resort();
        Some(priority)
    }

    /// Tasks in canonical order as of this call.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn resort(&mut self) {
        // Stable, so tasks with identical (due_date, priority) keep
        // their insertion order across repeated sorts.
        self.tasks
            .sort_by(|a, b| a.due_date.cmp(&b.due_date).then(b.priority.cmp(&a.priority)));
    }
}
