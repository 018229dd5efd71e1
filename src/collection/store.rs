use bson::Document;

use crate::errors::DocError;
use crate::update::UpdateOptions;

/// The raw write surface a [`super::SafeCollection`] delegates to.
///
/// Implementations perform no schema validation of their own.
pub trait DocumentStore: Send + Sync {
    /// All stored documents matching `condition`, in storage order.
    ///
    /// # Errors
    /// Returns an error if the condition is not valid.
    fn fetch_matching(&self, condition: &Document) -> Result<Vec<Document>, DocError>;

    /// Store `doc`, assigning an `_id` when it has none, and return what was stored.
    ///
    /// # Errors
    /// `Storage` when the `_id` is already taken.
    fn insert(&self, doc: Document) -> Result<Document, DocError>;

    /// Replace the document with the same `_id`, or insert it.
    ///
    /// # Errors
    /// Returns an error if the document cannot be stored.
    fn save(&self, doc: Document) -> Result<u64, DocError>;

    /// Apply `update` to matching documents and return how many were written.
    ///
    /// # Errors
    /// Returns an error if the condition or update is not valid.
    fn update(
        &self,
        condition: &Document,
        update: &Document,
        options: UpdateOptions,
    ) -> Result<u64, DocError>;
}
