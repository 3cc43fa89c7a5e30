//! Persistence layer: entity models, the EntityStore trait and the
//! in-memory implementation backing the server.

pub mod memory;
pub mod models;
pub mod traits;

pub use memory::MemoryStore;
pub use models::*;
pub use traits::EntityStore;
