use parking_lot::RwLock;
use std::collections::HashMap;

use super::types::Schema;

/// Named schemas that collections can attach by URI.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Schema>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under `uri`, replacing any previous entry.
    pub fn add_schema(&self, uri: impl Into<String>, schema: Schema) {
        let uri = uri.into();
        log::debug!("registering schema {uri}");
        self.schemas.write().insert(uri, schema);
    }

    #[must_use]
    pub fn get_schema(&self, uri: &str) -> Option<Schema> {
        self.schemas.read().get(uri).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }
}
