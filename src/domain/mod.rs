//! Core domain logic: filtering, sparse updates, reference resolution and
//! the referential guard, plus the services that compose them.

pub mod error;
pub mod filter;
pub mod guard;
pub mod patch;
pub mod resolver;
pub mod services;

pub use error::{Error, Result};
pub use filter::TaskFilter;
pub use patch::{Field, LabelPatch, StatusPatch, TaskPatch, UserPatch};
pub use resolver::{AssociationResolver, ResolvedRefs};
pub use services::{
    LabelCreate, LabelService, StatusCreate, StatusService, TaskCreate, TaskService, UserCreate,
    UserService,
};
