use bson::{Bson, Document, oid::ObjectId};
use parking_lot::RwLock;

use super::store::DocumentStore;
use crate::document::{ID_FIELD, deep_equal, has_id};
use crate::errors::DocError;
use crate::query::{QueryMatcher, equality_projection};
use crate::update::{UpdateApplier, UpdateOptions};

/// Process-local document store driven by [`QueryMatcher`] and [`UpdateApplier`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Snapshot of every stored document.
    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.docs.read().clone()
    }
}

fn position_of(docs: &[Document], id: &Bson) -> Option<usize> {
    docs.iter().position(|d| deep_equal(id, d.get(ID_FIELD)))
}

fn with_new_id(mut doc: Document) -> Document {
    if !has_id(&doc) {
        doc.insert(ID_FIELD, ObjectId::new());
    }
    doc
}

fn push_unique(docs: &mut Vec<Document>, doc: Document) -> Result<Document, DocError> {
    let doc = with_new_id(doc);
    if let Some(id) = doc.get(ID_FIELD)
        && position_of(docs, id).is_some()
    {
        return Err(DocError::Storage(format!("duplicate {ID_FIELD} {id}")));
    }
    docs.push(doc.clone());
    Ok(doc)
}

impl DocumentStore for MemoryStore {
    fn fetch_matching(&self, condition: &Document) -> Result<Vec<Document>, DocError> {
        let matcher = QueryMatcher::new(condition)?;
        Ok(self.docs.read().iter().filter(|d| matcher.matches(d)).cloned().collect())
    }

    fn insert(&self, doc: Document) -> Result<Document, DocError> {
        push_unique(&mut self.docs.write(), doc)
    }

    fn save(&self, doc: Document) -> Result<u64, DocError> {
        let mut docs = self.docs.write();
        let existing =
            doc.get(ID_FIELD).filter(|_| has_id(&doc)).and_then(|id| position_of(&docs, id));
        match existing {
            Some(i) => docs[i] = doc,
            None => {
                push_unique(&mut docs, doc)?;
            }
        }
        Ok(1)
    }

    fn update(
        &self,
        condition: &Document,
        update: &Document,
        options: UpdateOptions,
    ) -> Result<u64, DocError> {
        let matcher = QueryMatcher::new(condition)?;
        let applier = UpdateApplier::new(update, options)?;
        let mut docs = self.docs.write();
        let mut written = 0u64;
        for doc in docs.iter_mut().filter(|d| matcher.matches(d)) {
            let old_id = doc.get(ID_FIELD).cloned();
            let mut updated = applier.apply(doc.clone())?;
            if let Some(id) = old_id {
                updated.insert(ID_FIELD, id);
            }
            *doc = updated;
            written += 1;
            if !options.multi {
                break;
            }
        }
        if written == 0 && options.upsert {
            let base = if applier.is_operator_update() {
                equality_projection(condition)
            } else {
                Document::new()
            };
            let stored = push_unique(&mut docs, applier.apply(base)?)?;
            log::debug!("upserted document {:?}", stored.get(ID_FIELD));
            written = 1;
        }
        Ok(written)
    }
}
