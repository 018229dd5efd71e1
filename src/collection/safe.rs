use bson::Document;
use serde::{Deserialize, Serialize};

use super::store::DocumentStore;
use crate::errors::DocError;
use crate::logger::AUDIT_TARGET;
use crate::query::equality_projection;
use crate::schema::{CompiledSchema, Schema, SchemaRegistry, SchemaValidator};
use crate::update::{UpdateApplier, UpdateOptions};

/// Overrides for the checking policy of a collection with a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateOptions {
    /// Reject writes that fail validation. Defaults to `true` when a schema is given.
    #[serde(default)]
    pub enforce_checks: Option<bool>,
    /// Log failed validations at `warn`. Defaults to `false`.
    #[serde(default)]
    pub warn_on_wrong_data: Option<bool>,
}

/// A collection wrapper that validates documents against a schema before
/// they reach the store.
///
/// Update validation reads the matching documents, applies the update to
/// copies and validates them, then lets the store run the real update. A
/// concurrent writer can change the matching set in between; such writes are
/// not revalidated.
pub struct SafeCollection<S: DocumentStore> {
    store: S,
    schema: Option<CompiledSchema>,
    enforce_checks: bool,
    warnings_enabled: bool,
}

impl<S: DocumentStore> SafeCollection<S> {
    /// # Errors
    /// `InvalidSchema` when the schema does not describe an object.
    pub fn new(
        store: S,
        schema: Option<Schema>,
        options: Option<ValidateOptions>,
    ) -> Result<Self, DocError> {
        let mut col = Self { store, schema: None, enforce_checks: false, warnings_enabled: false };
        if let Some(schema) = schema {
            col.attach_schema(schema)?;
            let options = options.unwrap_or_default();
            col.warnings_enabled = options.warn_on_wrong_data.unwrap_or(false);
            col.enforce_checks = options.enforce_checks.unwrap_or(true);
        }
        Ok(col)
    }

    /// Check documents against `schema` from now on.
    ///
    /// # Errors
    /// `InvalidSchema` when the schema does not describe an object or does not compile.
    pub fn attach_schema(&mut self, schema: Schema) -> Result<&mut Self, DocError> {
        self.schema = Some(CompiledSchema::new(schema.with_id_field()?)?);
        Ok(self)
    }

    /// # Errors
    /// `InvalidSchema` when `uri` is not registered or its schema does not describe an object.
    pub fn attach_schema_uri(
        &mut self,
        registry: &SchemaRegistry,
        uri: &str,
    ) -> Result<&mut Self, DocError> {
        let schema = registry
            .get_schema(uri)
            .ok_or_else(|| DocError::InvalidSchema(format!("incorrect/missing schema {uri}")))?;
        self.attach_schema(schema)
    }

    pub fn set_check_enforcement(&mut self, enforce: bool) -> &mut Self {
        self.enforce_checks = enforce;
        self
    }

    pub fn warn_on_wrong_data(&mut self, enable: bool) -> &mut Self {
        self.warnings_enabled = enable;
        self
    }

    /// The attached schema, including the injected `_id` rule.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref().map(CompiledSchema::schema)
    }

    #[must_use]
    pub const fn enforces_checks(&self) -> bool {
        self.enforce_checks
    }

    #[must_use]
    pub const fn warns_on_wrong_data(&self) -> bool {
        self.warnings_enabled
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validate `doc` under the collection's policy.
    ///
    /// # Errors
    /// `NoSchema` when checks are enforced without a schema, the validation
    /// error when checks are enforced and `doc` does not conform.
    pub fn validate_with_default_schema(&self, doc: &Document) -> Result<(), DocError> {
        let Some(schema) = &self.schema else {
            return if self.enforce_checks { Err(DocError::NoSchema) } else { Ok(()) };
        };
        match schema.validate(doc) {
            Ok(()) => Ok(()),
            Err(e) => {
                if self.warnings_enabled {
                    log::warn!("document failed validation: {e}");
                }
                if self.enforce_checks { Err(e) } else { Ok(()) }
            }
        }
    }

    /// # Errors
    /// Returns an error if validation or the store rejects the document.
    pub fn insert(&self, doc: Document) -> Result<Document, DocError> {
        self.validate_with_default_schema(&doc)?;
        self.unsafe_insert(doc)
    }

    /// # Errors
    /// Returns an error if validation or the store rejects the document.
    pub fn save(&self, doc: Document) -> Result<u64, DocError> {
        self.validate_with_default_schema(&doc)?;
        self.unsafe_save(doc)
    }

    /// Validate what `update` would produce, then run it.
    ///
    /// Returns `0` without touching the store when nothing matches and
    /// `upsert` is off.
    ///
    /// # Errors
    /// Returns an error if the condition or update is invalid, or any
    /// updated document fails enforced validation.
    pub fn update(
        &self,
        condition: &Document,
        update: &Document,
        options: UpdateOptions,
    ) -> Result<u64, DocError> {
        if self.schema.is_none() {
            return self.unsafe_update(condition, update, options);
        }
        let mut candidates = self.store.fetch_matching(condition)?;
        if !options.multi {
            candidates.truncate(1);
        }
        let applier = UpdateApplier::new(update, options)?;
        if candidates.is_empty() {
            if !options.upsert {
                return Ok(0);
            }
            candidates.push(if applier.is_operator_update() {
                equality_projection(condition)
            } else {
                Document::new()
            });
        }
        for doc in candidates {
            self.validate_with_default_schema(&applier.apply(doc)?)?;
        }
        self.unsafe_update(condition, update, options)
    }

    /// # Errors
    /// Returns an error if the store rejects the document.
    pub fn unsafe_insert(&self, doc: Document) -> Result<Document, DocError> {
        let stored = self.store.insert(doc)?;
        log::info!(target: AUDIT_TARGET, "insert _id={:?}", stored.get("_id"));
        Ok(stored)
    }

    /// # Errors
    /// Returns an error if the store rejects the document.
    pub fn unsafe_save(&self, doc: Document) -> Result<u64, DocError> {
        let id = doc.get("_id").cloned();
        let n = self.store.save(doc)?;
        log::info!(target: AUDIT_TARGET, "save _id={id:?} written={n}");
        Ok(n)
    }

    /// # Errors
    /// Returns an error if the condition or update is not valid.
    pub fn unsafe_update(
        &self,
        condition: &Document,
        update: &Document,
        options: UpdateOptions,
    ) -> Result<u64, DocError> {
        let n = self.store.update(condition, update, options)?;
        log::info!(
            target: AUDIT_TARGET,
            "update upsert={} multi={} written={n}",
            options.upsert,
            options.multi
        );
        Ok(n)
    }
}
