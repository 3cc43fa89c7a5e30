//! Domain error taxonomy.
//!
//! Every error here is a caller-input problem scoped to a single operation;
//! none are retried internally. The HTTP layer translates them into protocol
//! responses (see `api::AppError`).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A primary entity addressed by id (or slug) does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A create/update payload names a status slug, assignee id or label id
    /// that does not resolve to an existing entity.
    #[error("{0}")]
    MissingReference(String),

    /// A delete is blocked: the target is still referenced by a task, or the
    /// acting user is not the task's author, or a uniqueness rule is violated.
    #[error("operation not possible: {0}")]
    Conflict(String),

    /// Payload fails basic shape constraints (blank title, name length).
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn missing_reference(msg: impl Into<String>) -> Self {
        Error::MissingReference(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Error::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
