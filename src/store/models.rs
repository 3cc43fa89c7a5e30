//! Entity types persisted by the [`EntityStore`](super::EntityStore).
//!
//! Ids are store-assigned sequential integers, one sequence per table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered account. Owns authored tasks and may be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Bcrypt digest — never leaves the store layer in serialized form.
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a [`User`]; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_digest: String,
}

/// A named workflow state. The slug is the stable identifier used in
/// task filters and task creation; the name is for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a [`TaskStatus`].
#[derive(Debug, Clone)]
pub struct NewTaskStatus {
    pub name: String,
    pub slug: String,
}

/// A tag attachable to any number of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a [`Label`].
#[derive(Debug, Clone)]
pub struct NewLabel {
    pub name: String,
}

/// A tracked unit of work.
///
/// Always has exactly one author and exactly one status. The author is set
/// at creation and never changes; assignee and labels are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub index: Option<i64>,
    pub author_id: i64,
    pub assignee_id: Option<i64>,
    pub title: String,
    pub content: Option<String>,
    pub status_id: i64,
    pub label_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a [`Task`]. All reference ids must already be
/// resolved; the store enforces them as foreign keys on insert.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub index: Option<i64>,
    pub author_id: i64,
    pub assignee_id: Option<i64>,
    pub title: String,
    pub content: Option<String>,
    pub status_id: i64,
    pub label_ids: BTreeSet<i64>,
}
