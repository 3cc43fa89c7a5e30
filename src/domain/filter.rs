//! Task filter predicate builder.
//!
//! A filter is a set of optional dimensions combined by AND: a task matches
//! iff every *supplied* dimension matches, and an omitted dimension imposes
//! no constraint. Deserializes directly from the `listTasks` query string
//! (`assigneeId`, `titleCont`, `status`, `labelId`).

use crate::store::models::Task;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskFilter {
    /// Matches tasks whose assignee has this id. A task with no assignee
    /// never matches when this is supplied.
    #[serde(rename = "assigneeId")]
    pub assignee_id: Option<i64>,

    /// Case-insensitive substring match against the task title.
    #[serde(rename = "titleCont")]
    pub title_cont: Option<String>,

    /// Exact match against the slug of the task's status. An unknown slug
    /// yields zero matches, never an error.
    #[serde(rename = "status")]
    pub status_slug: Option<String>,

    /// Matches tasks whose label set contains this id.
    #[serde(rename = "labelId")]
    pub label_id: Option<i64>,
}

impl TaskFilter {
    /// True when no dimension is supplied; such a filter matches every task.
    pub fn is_empty(&self) -> bool {
        self.assignee_id.is_none()
            && self.title_cont.is_none()
            && self.status_slug.is_none()
            && self.label_id.is_none()
    }

    /// Evaluates the conjunction of all supplied dimensions against one task.
    ///
    /// `status_slug` is the slug of the task's current status, resolved by
    /// the caller from the same snapshot the task came from. AND is
    /// commutative, so evaluation order does not affect the result.
    pub fn matches(&self, task: &Task, status_slug: Option<&str>) -> bool {
        self.matches_assignee(task)
            && self.matches_title(task)
            && self.matches_status(status_slug)
            && self.matches_label(task)
    }

    fn matches_assignee(&self, task: &Task) -> bool {
        match self.assignee_id {
            None => true,
            Some(id) => task.assignee_id == Some(id),
        }
    }

    fn matches_title(&self, task: &Task) -> bool {
        match &self.title_cont {
            None => true,
            Some(fragment) => task
                .title
                .to_lowercase()
                .contains(&fragment.to_lowercase()),
        }
    }

    fn matches_status(&self, status_slug: Option<&str>) -> bool {
        match &self.status_slug {
            None => true,
            Some(wanted) => status_slug == Some(wanted.as_str()),
        }
    }

    fn matches_label(&self, task: &Task) -> bool {
        match self.label_id {
            None => true,
            Some(id) => task.label_ids.contains(&id),
        }
    }
}
