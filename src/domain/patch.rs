//! Sparse update payloads with three-state field presence.
//!
//! JSON bodies for update endpoints distinguish a field that is *omitted*
//! (leave unchanged) from one that is *explicitly null* (clear it) from one
//! that carries a new value. A plain `Option<T>` collapses the first two, so
//! every patch field is a [`Field<T>`] instead: `#[serde(default)]` yields
//! `Missing` for absent keys, and the custom `Deserialize` maps JSON `null`
//! to `Null` and anything else to `Value`.

use crate::domain::error::{Error, Result};
use crate::domain::resolver::ResolvedRefs;
use crate::store::models::{Task, User};
use anyhow::anyhow;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

/// Presence wrapper for one patch field: omitted, explicitly null, or set.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Key absent from the payload — leave the current value unchanged.
    Missing,
    /// Key present with JSON `null` — clear the value (where allowed).
    Null,
    /// Key present with a value — overwrite.
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    /// The supplied value, if any. `Missing` and `Null` both yield `None`.
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present: serde's struct default
        // handles the Missing case.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Value(v),
            None => Field::Null,
        })
    }
}

/// Sparse change-set for a task.
///
/// Wire field names follow the task update endpoint: `index`, `assignee_id`,
/// `title`, `content`, `status` (a slug), `taskLabelIds`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub index: Field<i64>,
    pub assignee_id: Field<i64>,
    pub title: Field<String>,
    pub content: Field<String>,
    pub status: Field<String>,
    #[serde(rename = "taskLabelIds")]
    pub label_ids: Field<Vec<i64>>,
}

impl TaskPatch {
    /// Rejects shapes that can never merge: required fields cleared to null
    /// and blank titles. Runs before reference resolution so an invalid
    /// payload never touches the store.
    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Field::Null => return Err(Error::validation("title cannot be cleared")),
            Field::Value(t) if t.trim().is_empty() => {
                return Err(Error::validation("title must not be blank"))
            }
            _ => {}
        }
        if matches!(self.status, Field::Null) {
            return Err(Error::validation("status cannot be cleared"));
        }
        Ok(())
    }

    /// Merges the patch into `task`. Omitted fields are untouched; null
    /// fields are cleared; supplied reference fields take their ids from the
    /// already-resolved `refs` bundle so only validated references are ever
    /// written.
    pub fn apply(self, task: &mut Task, refs: ResolvedRefs) -> Result<()> {
        match self.index {
            Field::Missing => {}
            Field::Null => task.index = None,
            Field::Value(v) => task.index = Some(v),
        }
        match self.title {
            Field::Value(v) => task.title = v,
            _ => {}
        }
        match self.content {
            Field::Missing => {}
            Field::Null => task.content = None,
            Field::Value(v) => task.content = Some(v),
        }
        match self.assignee_id {
            Field::Missing => {}
            Field::Null => task.assignee_id = None,
            Field::Value(id) => {
                let assignee = refs
                    .assignee
                    .ok_or_else(|| anyhow!("assignee {id} was not resolved before merge"))?;
                task.assignee_id = Some(assignee.id);
            }
        }
        match self.status {
            Field::Value(slug) => {
                let status = refs
                    .status
                    .ok_or_else(|| anyhow!("status '{slug}' was not resolved before merge"))?;
                task.status_id = status.id;
            }
            _ => {}
        }
        match self.label_ids {
            Field::Missing => {}
            // Supplying a label list replaces the whole set; null clears it.
            Field::Null => task.label_ids.clear(),
            Field::Value(_) => {
                let labels = refs
                    .labels
                    .ok_or_else(|| anyhow!("labels were not resolved before merge"))?;
                task.label_ids = labels.iter().map(|l| l.id).collect::<BTreeSet<_>>();
            }
        }
        Ok(())
    }
}

/// Sparse change-set for a user. `firstName`/`lastName` are clearable;
/// email and password are required fields and reject explicit null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub email: Field<String>,
    #[serde(rename = "firstName")]
    pub first_name: Field<String>,
    #[serde(rename = "lastName")]
    pub last_name: Field<String>,
    pub password: Field<String>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<()> {
        match &self.email {
            Field::Null => return Err(Error::validation("email cannot be cleared")),
            Field::Value(e) if !e.contains('@') => {
                return Err(Error::validation("email must be a valid address"))
            }
            _ => {}
        }
        match &self.password {
            Field::Null => return Err(Error::validation("password cannot be cleared")),
            Field::Value(p) if p.len() < 3 => {
                return Err(Error::validation("password must be at least 3 characters"))
            }
            _ => {}
        }
        Ok(())
    }

    /// Merges everything except the password, which the service hashes
    /// before writing.
    pub fn apply(&self, user: &mut User) {
        if let Field::Value(email) = &self.email {
            user.email = email.clone();
        }
        match &self.first_name {
            Field::Missing => {}
            Field::Null => user.first_name = None,
            Field::Value(v) => user.first_name = Some(v.clone()),
        }
        match &self.last_name {
            Field::Missing => {}
            Field::Null => user.last_name = None,
            Field::Value(v) => user.last_name = Some(v.clone()),
        }
    }
}

/// Sparse change-set for a task status. Both fields are required on the
/// entity, so null is rejected; the slug may change but must stay unique
/// (enforced by the store).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusPatch {
    pub name: Field<String>,
    pub slug: Field<String>,
}

impl StatusPatch {
    pub fn validate(&self) -> Result<()> {
        if matches!(self.name, Field::Null) {
            return Err(Error::validation("name cannot be cleared"));
        }
        match &self.slug {
            Field::Null => return Err(Error::validation("slug cannot be cleared")),
            Field::Value(s) if s.trim().is_empty() => {
                return Err(Error::validation("slug must not be blank"))
            }
            _ => {}
        }
        Ok(())
    }
}

/// Sparse change-set for a label.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelPatch {
    pub name: Field<String>,
}

impl LabelPatch {
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Field::Null => Err(Error::validation("name cannot be cleared")),
            Field::Value(n) if n.len() < 3 || n.len() > 1000 => {
                Err(Error::validation("name must be between 3 and 1000 characters"))
            }
            _ => Ok(()),
        }
    }
}
