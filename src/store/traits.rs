//! EntityStore trait definition.
//!
//! Abstract interface over the persistence layer for the four entity types.
//! Lookup methods return `Ok(None)` for missing rows; write methods surface
//! domain errors (uniqueness conflicts, foreign-key violations, guarded
//! deletes). The `remove_*` operations for users, statuses and labels are
//! single atomic check-then-delete units: an implementation must run the
//! reference scan and the removal against one consistent snapshot.

use crate::domain::error::Result;
use crate::domain::filter::TaskFilter;
use crate::store::models::{
    Label, NewLabel, NewTask, NewTaskStatus, NewUser, Task, TaskStatus, User,
};
use async_trait::async_trait;

#[async_trait]
pub trait EntityStore: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Insert a new user. Fails with Conflict when the email is taken.
    async fn create_user(&self, new: NewUser) -> Result<User>;

    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    /// Persist changes to an existing user. Fails with NotFound when the id
    /// is unknown and with Conflict when the new email collides.
    async fn save_user(&self, user: User) -> Result<User>;

    /// Delete a user unless any task references them as author or assignee.
    async fn remove_user(&self, id: i64) -> Result<()>;

    // ========================================================================
    // Task statuses
    // ========================================================================

    /// Insert a new status. Fails with Conflict when the slug is taken.
    async fn create_status(&self, new: NewTaskStatus) -> Result<TaskStatus>;

    async fn get_status(&self, id: i64) -> Result<Option<TaskStatus>>;

    async fn get_status_by_slug(&self, slug: &str) -> Result<Option<TaskStatus>>;

    async fn list_statuses(&self) -> Result<Vec<TaskStatus>>;

    /// Persist changes to an existing status; the slug must stay unique.
    async fn save_status(&self, status: TaskStatus) -> Result<TaskStatus>;

    /// Delete a status unless any task still carries it.
    async fn remove_status(&self, id: i64) -> Result<()>;

    // ========================================================================
    // Labels
    // ========================================================================

    async fn create_label(&self, new: NewLabel) -> Result<Label>;

    async fn get_label(&self, id: i64) -> Result<Option<Label>>;

    /// Fetch the labels whose ids appear in `ids`; missing ids are simply
    /// absent from the result (callers detect them by set difference).
    async fn get_labels_by_ids(&self, ids: &[i64]) -> Result<Vec<Label>>;

    async fn list_labels(&self) -> Result<Vec<Label>>;

    async fn save_label(&self, label: Label) -> Result<Label>;

    /// Delete a label unless any task still carries it.
    async fn remove_label(&self, id: i64) -> Result<()>;

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Insert a new task. All reference ids are re-checked as foreign keys
    /// inside the write transaction, so a reference deleted after resolution
    /// fails loudly instead of dangling.
    async fn create_task(&self, new: NewTask) -> Result<Task>;

    async fn get_task(&self, id: i64) -> Result<Option<Task>>;

    /// Tasks matching every supplied filter dimension, ascending by id.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Persist changes to an existing task, with the same foreign-key
    /// re-check as `create_task`.
    async fn save_task(&self, task: Task) -> Result<Task>;

    async fn remove_task(&self, id: i64) -> Result<()>;
}
