use bson::Document;
use jsonschema::Validator;

use super::normalize::document_to_json;
use super::types::Schema;
use crate::errors::DocError;

/// Accepts or rejects a candidate document before it is written.
pub trait SchemaValidator: Send + Sync {
    /// # Errors
    /// `Validation` describing the first violation found.
    fn validate(&self, doc: &Document) -> Result<(), DocError>;
}

/// A schema compiled once and reused for every document.
pub struct CompiledSchema {
    schema: Schema,
    validator: Validator,
}

impl CompiledSchema {
    /// # Errors
    /// `InvalidSchema` when the schema itself is not valid JSON Schema.
    pub fn new(schema: Schema) -> Result<Self, DocError> {
        let validator = jsonschema::validator_for(schema.as_value())
            .map_err(|e| DocError::InvalidSchema(e.to_string()))?;
        Ok(Self { schema, validator })
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema").field("schema", &self.schema).finish_non_exhaustive()
    }
}

impl SchemaValidator for CompiledSchema {
    fn validate(&self, doc: &Document) -> Result<(), DocError> {
        let instance = document_to_json(doc);
        match self.validator.iter_errors(&instance).next() {
            Some(err) => Err(DocError::Validation(err.to_string())),
            None => Ok(()),
        }
    }
}

impl SchemaValidator for Schema {
    /// Compiles on every call; attach a [`CompiledSchema`] for repeated use.
    fn validate(&self, doc: &Document) -> Result<(), DocError> {
        CompiledSchema::new(self.clone())?.validate(doc)
    }
}
