//! Document validation against JSON Schema.
//!
//! Documents are normalized to plain JSON before checking, see
//! [`document_to_json`].

mod normalize;
mod registry;
mod types;
mod validate;

pub use normalize::{document_to_json, to_json};
pub use registry::SchemaRegistry;
pub use types::{OBJECT_ID_PATTERN, Schema};
pub use validate::{CompiledSchema, SchemaValidator};
