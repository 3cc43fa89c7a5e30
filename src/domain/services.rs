//! Application services: one per entity type, each a thin stateless wrapper
//! over the shared [`EntityStore`].
//!
//! Create and update flows run resolve-then-merge-then-persist; deletes go
//! through the store's guarded removals. The acting principal is always an
//! explicit argument, never ambient state.

use crate::auth::password;
use crate::domain::error::{Error, Result};
use crate::domain::filter::TaskFilter;
use crate::domain::patch::{Field, LabelPatch, StatusPatch, TaskPatch, UserPatch};
use crate::domain::guard;
use crate::domain::resolver::AssociationResolver;
use crate::store::models::{
    Label, NewLabel, NewTask, NewTaskStatus, NewUser, Task, TaskStatus, User,
};
use crate::store::traits::EntityStore;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

// ============================================================================
// Create payloads
// ============================================================================

/// Task creation payload. The author is deliberately absent: it comes from
/// the authenticated principal, not from client-provided data.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreate {
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    /// Status slug, required.
    pub status: String,
    #[serde(default, rename = "taskLabelIds")]
    pub label_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCreate {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelCreate {
    pub name: String,
}

// ============================================================================
// Tasks
// ============================================================================

pub struct TaskService {
    store: Arc<dyn EntityStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.store.list_tasks(filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Task> {
        self.store
            .get_task(id)
            .await?
            .ok_or_else(|| Error::not_found("Task", id))
    }

    /// Creates a task authored by `author_id` (the authenticated principal).
    /// All supplied references are resolved up front; a dangling status slug,
    /// assignee id or label id fails the whole operation.
    pub async fn create(&self, data: TaskCreate, author_id: i64) -> Result<Task> {
        if data.title.trim().is_empty() {
            return Err(Error::validation("title must not be blank"));
        }

        let resolver = AssociationResolver::new(self.store.as_ref());
        let refs = resolver
            .resolve(Some(&data.status), data.assignee_id, Some(&data.label_ids))
            .await?;

        let status = refs
            .status
            .ok_or_else(|| anyhow::anyhow!("status missing after resolution"))?;
        let task = self
            .store
            .create_task(NewTask {
                index: data.index,
                author_id,
                assignee_id: refs.assignee.map(|u| u.id),
                title: data.title,
                content: data.content,
                status_id: status.id,
                label_ids: refs
                    .labels
                    .unwrap_or_default()
                    .iter()
                    .map(|l| l.id)
                    .collect::<BTreeSet<_>>(),
            })
            .await?;

        tracing::info!(task_id = task.id, author_id, "created task");
        Ok(task)
    }

    /// Applies a sparse patch: omitted fields stay untouched, null fields are
    /// cleared, and reference fields are re-resolved only when supplied. The
    /// merge and persist are all-or-nothing — a resolution failure leaves the
    /// stored task exactly as it was.
    pub async fn update(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        let mut task = self.get(id).await?;
        patch.validate()?;

        let resolver = AssociationResolver::new(self.store.as_ref());
        let refs = resolver
            .resolve(
                patch.status.value().map(String::as_str),
                patch.assignee_id.value().copied(),
                patch.label_ids.value().map(Vec::as_slice),
            )
            .await?;

        patch.apply(&mut task, refs)?;
        let task = self.store.save_task(task).await?;
        tracing::info!(task_id = task.id, "updated task");
        Ok(task)
    }

    /// Deletes a task; only its author may do so.
    pub async fn delete(&self, id: i64, acting_user_id: i64) -> Result<()> {
        let task = self.get(id).await?;
        guard::ensure_author(&task, acting_user_id)?;
        self.store.remove_task(id).await?;
        tracing::info!(task_id = id, acting_user_id, "deleted task");
        Ok(())
    }
}

// ============================================================================
// Users
// ============================================================================

pub struct UserService {
    store: Arc<dyn EntityStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.store.list_users().await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| Error::not_found("User", id))
    }

    pub async fn create(&self, data: UserCreate) -> Result<User> {
        if !data.email.contains('@') {
            return Err(Error::validation("email must be a valid address"));
        }
        if data.password.len() < 3 {
            return Err(Error::validation("password must be at least 3 characters"));
        }

        let user = self
            .store
            .create_user(NewUser {
                email: data.email,
                first_name: data.first_name,
                last_name: data.last_name,
                password_digest: password::hash(&data.password)?,
            })
            .await?;
        tracing::info!(user_id = user.id, "created user");
        Ok(user)
    }

    /// Sparse user update; the password digest is recomputed only when a new
    /// password was supplied.
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User> {
        patch.validate()?;
        let mut user = self.get(id).await?;
        patch.apply(&mut user);
        if let Field::Value(plain) = &patch.password {
            user.password_digest = password::hash(plain)?;
        }
        self.store.save_user(user).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.remove_user(id).await?;
        tracing::info!(user_id = id, "deleted user");
        Ok(())
    }
}

// ============================================================================
// Task statuses
// ============================================================================

pub struct StatusService {
    store: Arc<dyn EntityStore>,
}

impl StatusService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<TaskStatus>> {
        self.store.list_statuses().await
    }

    pub async fn get(&self, id: i64) -> Result<TaskStatus> {
        self.store
            .get_status(id)
            .await?
            .ok_or_else(|| Error::not_found("TaskStatus", id))
    }

    pub async fn create(&self, data: StatusCreate) -> Result<TaskStatus> {
        if data.name.trim().is_empty() || data.slug.trim().is_empty() {
            return Err(Error::validation("name and slug must not be blank"));
        }
        self.store
            .create_status(NewTaskStatus {
                name: data.name,
                slug: data.slug,
            })
            .await
    }

    pub async fn update(&self, id: i64, patch: StatusPatch) -> Result<TaskStatus> {
        patch.validate()?;
        let mut status = self.get(id).await?;
        if let Field::Value(name) = &patch.name {
            status.name = name.clone();
        }
        if let Field::Value(slug) = &patch.slug {
            status.slug = slug.clone();
        }
        self.store.save_status(status).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.remove_status(id).await
    }
}

// ============================================================================
// Labels
// ============================================================================

pub struct LabelService {
    store: Arc<dyn EntityStore>,
}

impl LabelService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Label>> {
        self.store.list_labels().await
    }

    pub async fn get(&self, id: i64) -> Result<Label> {
        self.store
            .get_label(id)
            .await?
            .ok_or_else(|| Error::not_found("Label", id))
    }

    pub async fn create(&self, data: LabelCreate) -> Result<Label> {
        if data.name.len() < 3 || data.name.len() > 1000 {
            return Err(Error::validation("name must be between 3 and 1000 characters"));
        }
        self.store.create_label(NewLabel { name: data.name }).await
    }

    pub async fn update(&self, id: i64, patch: LabelPatch) -> Result<Label> {
        patch.validate()?;
        let mut label = self.get(id).await?;
        if let Field::Value(name) = &patch.name {
            label.name = name.clone();
        }
        self.store.save_label(label).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.remove_label(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    async fn seeded() -> (Arc<MemoryStore>, User, TaskStatus, Label) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(NewUser {
                email: "author@example.com".to_string(),
                first_name: Some("Jane".to_string()),
                last_name: Some("Doe".to_string()),
                // Pre-hashed digest: service-level tests never log in.
                password_digest: "digest".to_string(),
            })
            .await
            .unwrap();
        let status = store
            .create_status(NewTaskStatus {
                name: "Draft".to_string(),
                slug: "draft".to_string(),
            })
            .await
            .unwrap();
        let label = store
            .create_label(NewLabel {
                name: "bug".to_string(),
            })
            .await
            .unwrap();
        (store, user, status, label)
    }

    fn task_create(status: &str, labels: Vec<i64>) -> TaskCreate {
        TaskCreate {
            index: None,
            assignee_id: None,
            title: "T1".to_string(),
            content: None,
            status: status.to_string(),
            label_ids: labels,
        }
    }

    #[tokio::test]
    async fn test_create_task_resolves_references() {
        let (store, author, status, label) = seeded().await;
        let service = TaskService::new(store.clone());

        let mut data = task_create("draft", vec![label.id]);
        data.assignee_id = Some(author.id);
        let task = service.create(data, author.id).await.unwrap();

        assert_eq!(task.author_id, author.id);
        assert_eq!(task.assignee_id, Some(author.id));
        assert_eq!(task.status_id, status.id);
        assert!(task.label_ids.contains(&label.id));
    }

    #[tokio::test]
    async fn test_create_task_unknown_status_fails() {
        let (store, author, _, _) = seeded().await;
        let service = TaskService::new(store.clone());

        let err = service
            .create(task_create("archived", vec![]), author.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingReference(_)));
        assert!(service.list(&TaskFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_is_all_or_nothing() {
        let (store, author, _, _) = seeded().await;
        let service = TaskService::new(store.clone());
        let task = service
            .create(task_create("draft", vec![]), author.id)
            .await
            .unwrap();

        // Title change is valid, but the label reference dangles: nothing
        // may be applied.
        let patch: TaskPatch =
            serde_json::from_str(r#"{"title":"New title","taskLabelIds":[99]}"#).unwrap();
        let err = service.update(task.id, patch).await.unwrap_err();
        assert!(matches!(err, Error::MissingReference(_)));

        let unchanged = service.get(task.id).await.unwrap();
        assert_eq!(unchanged, task);
    }

    #[tokio::test]
    async fn test_update_with_empty_patch_is_idempotent() {
        let (store, author, _, _) = seeded().await;
        let service = TaskService::new(store.clone());
        let task = service
            .create(task_create("draft", vec![]), author.id)
            .await
            .unwrap();

        let updated = service.update(task.id, TaskPatch::default()).await.unwrap();
        assert_eq!(updated, task);
    }

    #[tokio::test]
    async fn test_update_replaces_label_set() {
        let (store, author, _, label) = seeded().await;
        let other = store
            .create_label(NewLabel {
                name: "feature".to_string(),
            })
            .await
            .unwrap();
        let service = TaskService::new(store.clone());
        let task = service
            .create(task_create("draft", vec![label.id]), author.id)
            .await
            .unwrap();

        let patch: TaskPatch =
            serde_json::from_value(serde_json::json!({ "taskLabelIds": [other.id] })).unwrap();
        let updated = service.update(task.id, patch).await.unwrap();
        assert_eq!(updated.label_ids.iter().copied().collect::<Vec<_>>(), vec![other.id]);
    }

    #[tokio::test]
    async fn test_delete_requires_authorship() {
        let (store, author, _, _) = seeded().await;
        let stranger = store
            .create_user(NewUser {
                email: "stranger@example.com".to_string(),
                first_name: None,
                last_name: None,
                password_digest: "digest".to_string(),
            })
            .await
            .unwrap();
        let service = TaskService::new(store.clone());
        let task = service
            .create(task_create("draft", vec![]), author.id)
            .await
            .unwrap();

        let err = service.delete(task.id, stranger.id).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(service.get(task.id).await.is_ok(), "task survives rejected delete");

        service.delete(task.id, author.id).await.unwrap();
        assert!(matches!(
            service.get(task.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_user_update_rehashes_only_when_password_supplied() {
        let (store, user, _, _) = seeded().await;
        let service = UserService::new(store.clone());

        let patch: UserPatch = serde_json::from_str(r#"{"firstName":"Janet"}"#).unwrap();
        let updated = service.update(user.id, patch).await.unwrap();
        assert_eq!(updated.password_digest, "digest");

        let patch: UserPatch = serde_json::from_str(r#"{"password":"new-secret"}"#).unwrap();
        let updated = service.update(user.id, patch).await.unwrap();
        assert_ne!(updated.password_digest, "digest");
        assert!(password::verify("new-secret", &updated.password_digest));
    }

    #[tokio::test]
    async fn test_status_update_keeps_identity() {
        let (store, _, status, _) = seeded().await;
        let service = StatusService::new(store.clone());

        let patch: StatusPatch = serde_json::from_str(r#"{"name":"Draft v2"}"#).unwrap();
        let updated = service.update(status.id, patch).await.unwrap();
        assert_eq!(updated.id, status.id);
        assert_eq!(updated.name, "Draft v2");
        assert_eq!(updated.slug, "draft");
    }

    #[tokio::test]
    async fn test_label_create_validates_length() {
        let (store, _, _, _) = seeded().await;
        let service = LabelService::new(store.clone());
        let err = service
            .create(LabelCreate { name: "ab".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
