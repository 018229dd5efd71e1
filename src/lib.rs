//! MongoDB-style condition matching and update application over BSON
//! documents, with schema-checked writes on top.
//!
//! ```
//! use bson::doc;
//! use docguard::query::QueryMatcher;
//! use docguard::update::{UpdateApplier, UpdateOptions};
//!
//! let matcher = QueryMatcher::new(&doc! {"age": {"$gt": 18}}).unwrap();
//! assert!(matcher.matches(&doc! {"age": 30}));
//!
//! let update = UpdateApplier::new(&doc! {"$inc": {"age": 1}}, UpdateOptions::default()).unwrap();
//! assert_eq!(update.apply(doc! {"age": 30}).unwrap(), doc! {"age": 31});
//! ```

pub mod collection;
pub mod config;
pub mod document;
pub mod errors;
pub mod logger;
pub mod query;
pub mod schema;
pub mod update;
pub mod utils;

pub use collection::{DocumentStore, MemoryStore, SafeCollection, ValidateOptions};
pub use config::{GuardConfig, load_config};
pub use errors::DocError;
pub use query::QueryMatcher;
pub use schema::{CompiledSchema, Schema, SchemaRegistry, SchemaValidator};
pub use update::{UpdateApplier, UpdateOptions};

/// Configure logging from the environment.
///
/// # Errors
/// Returns an error if the log files cannot be created.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::configure_from_env()
}
