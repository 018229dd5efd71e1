//! Schema-checked writes on top of a document store.

mod memory;
mod safe;
mod store;

pub use memory::MemoryStore;
pub use safe::{SafeCollection, ValidateOptions};
pub use store::DocumentStore;
