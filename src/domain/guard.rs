//! Referential guard: precondition checks for destructive operations.
//!
//! The reference scans are pure functions over a task snapshot. The store
//! runs them inside its write-lock critical section so the scan and the
//! removal observe one consistent snapshot (begin-scan-act-commit); a task
//! created concurrently can never be left with a dangling reference.

use crate::domain::error::{Error, Result};
use crate::store::models::Task;

/// True when any task currently points at this status.
pub fn status_referenced<'a>(tasks: impl IntoIterator<Item = &'a Task>, status_id: i64) -> bool {
    tasks.into_iter().any(|t| t.status_id == status_id)
}

/// True when any task carries this label.
pub fn label_referenced<'a>(tasks: impl IntoIterator<Item = &'a Task>, label_id: i64) -> bool {
    tasks.into_iter().any(|t| t.label_ids.contains(&label_id))
}

/// True when any task references this user as assignee or author.
///
/// Authors count: `Task.author` is required and immutable, so deleting an
/// author would orphan the task permanently.
pub fn user_referenced<'a>(tasks: impl IntoIterator<Item = &'a Task>, user_id: i64) -> bool {
    tasks
        .into_iter()
        .any(|t| t.author_id == user_id || t.assignee_id == Some(user_id))
}

/// Only the author may delete a task. An ownership check rather than a
/// referential one, but it shares the check-then-act shape.
pub fn ensure_author(task: &Task, acting_user_id: i64) -> Result<()> {
    if task.author_id == acting_user_id {
        Ok(())
    } else {
        Err(Error::conflict(format!(
            "task {} can only be deleted by its author",
            task.id
        )))
    }
}
