//! Association resolver.
//!
//! Turns externally supplied identifiers (a status slug, an assignee id, a
//! set of label ids) into live entity references in a single all-or-nothing
//! pass: any dangling identifier fails the whole resolution with
//! [`Error::MissingReference`] before anything is written. The task author is
//! never resolved here — it is the authenticated principal, passed into the
//! services explicitly, so a client cannot author a task as someone else.

use crate::domain::error::{Error, Result};
use crate::store::models::{Label, TaskStatus, User};
use crate::store::traits::EntityStore;
use std::collections::BTreeSet;

/// A fully-resolved bundle of references. Each slot is `Some` exactly when
/// the corresponding identifier was supplied to [`AssociationResolver::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResolvedRefs {
    pub status: Option<TaskStatus>,
    pub assignee: Option<User>,
    pub labels: Option<Vec<Label>>,
}

pub struct AssociationResolver<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> AssociationResolver<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Resolves every supplied identifier; omitted ones stay `None` in the
    /// result and impose nothing on the caller.
    pub async fn resolve(
        &self,
        status_slug: Option<&str>,
        assignee_id: Option<i64>,
        label_ids: Option<&[i64]>,
    ) -> Result<ResolvedRefs> {
        let mut refs = ResolvedRefs::default();

        if let Some(slug) = status_slug {
            let status = self.store.get_status_by_slug(slug).await?.ok_or_else(|| {
                Error::missing_reference(format!("task status with slug '{slug}' does not exist"))
            })?;
            refs.status = Some(status);
        }

        if let Some(id) = assignee_id {
            let assignee = self
                .store
                .get_user(id)
                .await?
                .ok_or_else(|| Error::missing_reference(format!("assignee {id} does not exist")))?;
            refs.assignee = Some(assignee);
        }

        if let Some(ids) = label_ids {
            refs.labels = Some(self.resolve_labels(ids).await?);
        }

        Ok(refs)
    }

    /// All-or-nothing label lookup: missing ids are reported together
    /// instead of silently dropped.
    async fn resolve_labels(&self, ids: &[i64]) -> Result<Vec<Label>> {
        let labels = self.store.get_labels_by_ids(ids).await?;
        let found: BTreeSet<i64> = labels.iter().map(|l| l.id).collect();
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(Error::missing_reference(format!(
                "labels do not exist: {missing:?}"
            )));
        }
        Ok(labels)
    }
}
