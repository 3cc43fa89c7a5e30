//! In-memory EntityStore.
//!
//! All four tables live behind a single `RwLock`, so every write method is
//! one critical section: guarded deletes run their reference scan and the
//! removal against the same snapshot, and task writes re-check foreign keys
//! at insert time. That lock is what stands in for the transaction a SQL
//! backend would provide; an implementation over a real database would map
//! each method onto one transaction at read-committed or better.

use crate::domain::error::{Error, Result};
use crate::domain::filter::TaskFilter;
use crate::domain::guard;
use crate::store::models::{
    Label, NewLabel, NewTask, NewTaskStatus, NewUser, Task, TaskStatus, User,
};
use crate::store::traits::EntityStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    statuses: HashMap<i64, TaskStatus>,
    labels: HashMap<i64, Label>,
    tasks: HashMap<i64, Task>,
    next_user_id: i64,
    next_status_id: i64,
    next_label_id: i64,
    next_task_id: i64,
}

impl Tables {
    /// Foreign-key backstop shared by task insert and update: every
    /// referenced row must exist at write time.
    fn check_task_refs(
        &self,
        status_id: i64,
        assignee_id: Option<i64>,
        label_ids: impl IntoIterator<Item = i64>,
    ) -> Result<()> {
        if !self.statuses.contains_key(&status_id) {
            return Err(Error::missing_reference(format!(
                "task status {status_id} does not exist"
            )));
        }
        if let Some(id) = assignee_id {
            if !self.users.contains_key(&id) {
                return Err(Error::missing_reference(format!(
                    "assignee {id} does not exist"
                )));
            }
        }
        for id in label_ids {
            if !self.labels.contains_key(&id) {
                return Err(Error::missing_reference(format!("label {id} does not exist")));
            }
        }
        Ok(())
    }

    fn email_taken(&self, email: &str, excluding: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != excluding)
    }

    fn slug_taken(&self, slug: &str, excluding: Option<i64>) -> bool {
        self.statuses
            .values()
            .any(|s| s.slug == slug && Some(s.id) != excluding)
    }
}

/// Sequential id assignment, one sequence per table, first id 1.
fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    // ========================================================================
    // Users
    // ========================================================================

    async fn create_user(&self, new: NewUser) -> Result<User> {
        let mut tables = self.inner.write().await;
        if tables.email_taken(&new.email, None) {
            return Err(Error::conflict(format!("email {} is already in use", new.email)));
        }
        let now = Utc::now();
        let user = User {
            id: next_id(&mut tables.next_user_id),
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            password_digest: new.password_digest,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.inner.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn save_user(&self, mut user: User) -> Result<User> {
        let mut tables = self.inner.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(Error::not_found("User", user.id));
        }
        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(Error::conflict(format!("email {} is already in use", user.email)));
        }
        user.updated_at = Utc::now();
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn remove_user(&self, id: i64) -> Result<()> {
        let mut tables = self.inner.write().await;
        if !tables.users.contains_key(&id) {
            return Err(Error::not_found("User", id));
        }
        if guard::user_referenced(tables.tasks.values(), id) {
            return Err(Error::conflict(format!(
                "user {id} is still referenced by a task"
            )));
        }
        tables.users.remove(&id);
        Ok(())
    }

    // ========================================================================
    // Task statuses
    // ========================================================================

    async fn create_status(&self, new: NewTaskStatus) -> Result<TaskStatus> {
        let mut tables = self.inner.write().await;
        if tables.slug_taken(&new.slug, None) {
            return Err(Error::conflict(format!("slug {} is already in use", new.slug)));
        }
        let status = TaskStatus {
            id: next_id(&mut tables.next_status_id),
            name: new.name,
            slug: new.slug,
            created_at: Utc::now(),
        };
        tables.statuses.insert(status.id, status.clone());
        Ok(status)
    }

    async fn get_status(&self, id: i64) -> Result<Option<TaskStatus>> {
        Ok(self.inner.read().await.statuses.get(&id).cloned())
    }

    async fn get_status_by_slug(&self, slug: &str) -> Result<Option<TaskStatus>> {
        Ok(self
            .inner
            .read()
            .await
            .statuses
            .values()
            .find(|s| s.slug == slug)
            .cloned())
    }

    async fn list_statuses(&self) -> Result<Vec<TaskStatus>> {
        let tables = self.inner.read().await;
        let mut statuses: Vec<TaskStatus> = tables.statuses.values().cloned().collect();
        statuses.sort_by_key(|s| s.id);
        Ok(statuses)
    }

    async fn save_status(&self, status: TaskStatus) -> Result<TaskStatus> {
        let mut tables = self.inner.write().await;
        if !tables.statuses.contains_key(&status.id) {
            return Err(Error::not_found("TaskStatus", status.id));
        }
        if tables.slug_taken(&status.slug, Some(status.id)) {
            return Err(Error::conflict(format!(
                "slug {} is already in use",
                status.slug
            )));
        }
        tables.statuses.insert(status.id, status.clone());
        Ok(status)
    }

    async fn remove_status(&self, id: i64) -> Result<()> {
        let mut tables = self.inner.write().await;
        if !tables.statuses.contains_key(&id) {
            return Err(Error::not_found("TaskStatus", id));
        }
        if guard::status_referenced(tables.tasks.values(), id) {
            return Err(Error::conflict(format!(
                "status {id} is still referenced by a task"
            )));
        }
        tables.statuses.remove(&id);
        Ok(())
    }

    // ========================================================================
    // Labels
    // ========================================================================

    async fn create_label(&self, new: NewLabel) -> Result<Label> {
        let mut tables = self.inner.write().await;
        let label = Label {
            id: next_id(&mut tables.next_label_id),
            name: new.name,
            created_at: Utc::now(),
        };
        tables.labels.insert(label.id, label.clone());
        Ok(label)
    }

    async fn get_label(&self, id: i64) -> Result<Option<Label>> {
        Ok(self.inner.read().await.labels.get(&id).cloned())
    }

    async fn get_labels_by_ids(&self, ids: &[i64]) -> Result<Vec<Label>> {
        let tables = self.inner.read().await;
        let mut labels: Vec<Label> = ids
            .iter()
            .filter_map(|id| tables.labels.get(id).cloned())
            .collect();
        labels.sort_by_key(|l| l.id);
        labels.dedup_by_key(|l| l.id);
        Ok(labels)
    }

    async fn list_labels(&self) -> Result<Vec<Label>> {
        let tables = self.inner.read().await;
        let mut labels: Vec<Label> = tables.labels.values().cloned().collect();
        labels.sort_by_key(|l| l.id);
        Ok(labels)
    }

    async fn save_label(&self, label: Label) -> Result<Label> {
        let mut tables = self.inner.write().await;
        if !tables.labels.contains_key(&label.id) {
            return Err(Error::not_found("Label", label.id));
        }
        tables.labels.insert(label.id, label.clone());
        Ok(label)
    }

    async fn remove_label(&self, id: i64) -> Result<()> {
        let mut tables = self.inner.write().await;
        if !tables.labels.contains_key(&id) {
            return Err(Error::not_found("Label", id));
        }
        if guard::label_referenced(tables.tasks.values(), id) {
            return Err(Error::conflict(format!(
                "label {id} is still referenced by a task"
            )));
        }
        tables.labels.remove(&id);
        Ok(())
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    async fn create_task(&self, new: NewTask) -> Result<Task> {
        let mut tables = self.inner.write().await;
        if !tables.users.contains_key(&new.author_id) {
            return Err(Error::missing_reference(format!(
                "author {} does not exist",
                new.author_id
            )));
        }
        tables.check_task_refs(
            new.status_id,
            new.assignee_id,
            new.label_ids.iter().copied(),
        )?;
        let task = Task {
            id: next_id(&mut tables.next_task_id),
            index: new.index,
            author_id: new.author_id,
            assignee_id: new.assignee_id,
            title: new.title,
            content: new.content,
            status_id: new.status_id,
            label_ids: new.label_ids,
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tables = self.inner.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| {
                let slug = tables.statuses.get(&t.status_id).map(|s| s.slug.as_str());
                filter.matches(t, slug)
            })
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn save_task(&self, task: Task) -> Result<Task> {
        let mut tables = self.inner.write().await;
        let existing = tables
            .tasks
            .get(&task.id)
            .ok_or_else(|| Error::not_found("Task", task.id))?;
        if existing.author_id != task.author_id {
            return Err(Error::conflict("task author is immutable"));
        }
        tables.check_task_refs(
            task.status_id,
            task.assignee_id,
            task.label_ids.iter().copied(),
        )?;
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn remove_task(&self, id: i64) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables.tasks.remove(&id).is_none() {
            return Err(Error::not_found("Task", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    async fn seeded() -> (MemoryStore, User, TaskStatus, Label) {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                email: "author@example.com".to_string(),
                first_name: None,
                last_name: None,
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

    fn new_task(author: i64, status: i64, labels: &[i64]) -> NewTask {
        NewTask {
            index: None,
            author_id: author,
            assignee_id: None,
            title: "T1".to_string(),
            content: None,
            status_id: status,
            label_ids: labels.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_table() {
        let store = MemoryStore::new();
        let a = store
            .create_label(NewLabel { name: "one".to_string() })
            .await
            .unwrap();
        let b = store
            .create_label(NewLabel { name: "two".to_string() })
            .await
            .unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let status = store
            .create_status(NewTaskStatus {
                name: "Draft".to_string(),
                slug: "draft".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(status.id, 1, "each table has its own sequence");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (store, user, _, _) = seeded().await;
        let err = store
            .create_user(NewUser {
                email: user.email.clone(),
                first_name: None,
                last_name: None,
                password_digest: "other".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let (store, _, status, _) = seeded().await;
        let err = store
            .create_status(NewTaskStatus {
                name: "Other".to_string(),
                slug: status.slug.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_task_rejects_dangling_refs() {
        let (store, user, status, _) = seeded().await;

        let err = store.create_task(new_task(user.id, 99, &[])).await.unwrap_err();
        assert!(matches!(err, Error::MissingReference(_)));

        let err = store
            .create_task(new_task(user.id, status.id, &[42]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingReference(_)));

        let mut task = new_task(user.id, status.id, &[]);
        task.assignee_id = Some(42);
        let err = store.create_task(task).await.unwrap_err();
        assert!(matches!(err, Error::MissingReference(_)));
    }

    #[tokio::test]
    async fn test_save_task_keeps_author_immutable() {
        let (store, user, status, _) = seeded().await;
        let other = store
            .create_user(NewUser {
                email: "other@example.com".to_string(),
                first_name: None,
                last_name: None,
                password_digest: "digest".to_string(),
            })
            .await
            .unwrap();

        let mut task = store
            .create_task(new_task(user.id, status.id, &[]))
            .await
            .unwrap();
        task.author_id = other.id;
        let err = store.save_task(task).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_guarded_label_delete() {
        let (store, user, status, label) = seeded().await;
        let task = store
            .create_task(new_task(user.id, status.id, &[label.id]))
            .await
            .unwrap();

        let err = store.remove_label(label.id).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(store.get_label(label.id).await.unwrap().is_some());

        store.remove_task(task.id).await.unwrap();
        store.remove_label(label.id).await.unwrap();
        assert!(store.get_label(label.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_guarded_status_delete() {
        let (store, user, status, _) = seeded().await;
        store
            .create_task(new_task(user.id, status.id, &[]))
            .await
            .unwrap();
        let err = store.remove_status(status.id).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_guarded_user_delete_blocks_author_and_assignee() {
        let (store, author, status, _) = seeded().await;
        let assignee = store
            .create_user(NewUser {
                email: "assignee@example.com".to_string(),
                first_name: None,
                last_name: None,
                password_digest: "digest".to_string(),
            })
            .await
            .unwrap();
        let mut task = new_task(author.id, status.id, &[]);
        task.assignee_id = Some(assignee.id);
        store.create_task(task).await.unwrap();

        assert!(matches!(
            store.remove_user(author.id).await.unwrap_err(),
            Error::Conflict(_)
        ));
        assert!(matches!(
            store.remove_user(assignee.id).await.unwrap_err(),
            Error::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_remove_missing_entities_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.remove_user(1).await.unwrap_err(), Error::NotFound { .. }));
        assert!(matches!(store.remove_status(1).await.unwrap_err(), Error::NotFound { .. }));
        assert!(matches!(store.remove_label(1).await.unwrap_err(), Error::NotFound { .. }));
        assert!(matches!(store.remove_task(1).await.unwrap_err(), Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_tasks_filters_and_orders_by_id() {
        let (store, user, status, label) = seeded().await;
        let published = store
            .create_status(NewTaskStatus {
                name: "Published".to_string(),
                slug: "published".to_string(),
            })
            .await
            .unwrap();

        let t1 = store
            .create_task(new_task(user.id, status.id, &[label.id]))
            .await
            .unwrap();
        let t2 = store
            .create_task(new_task(user.id, published.id, &[]))
            .await
            .unwrap();

        let all = store.list_tasks(&TaskFilter::default()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t1.id, t2.id]);

        let drafts = store
            .list_tasks(&TaskFilter {
                status_slug: Some("draft".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(drafts.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t1.id]);

        let none = store
            .list_tasks(&TaskFilter {
                status_slug: Some("archived".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
