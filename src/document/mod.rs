//! Document model helpers shared by the matcher and the applier.
//!
//! Documents are plain `bson::Document` trees. The helpers here classify keys
//! and values the way the query and update languages see them.

mod compare;
pub mod path;

pub use bson::{Bson, Document};
pub use compare::{compare_values, deep_equal};
pub use path::{last_segment, resolve_container, resolve_read};

/// Field name that carries a document's identity.
pub const ID_FIELD: &str = "_id";

/// A key is an operator when it contains `$` anywhere, not only as a prefix.
///
/// A field literally named `a$b` is therefore classified as an operator.
#[inline]
#[must_use]
pub fn is_operator(key: &str) -> bool {
    key.contains('$')
}

#[must_use]
pub fn has_operator_key(doc: &Document) -> bool {
    doc.keys().any(|k| is_operator(k))
}

#[must_use]
pub fn has_plain_key(doc: &Document) -> bool {
    doc.keys().any(|k| !is_operator(k))
}

/// True when the document carries a non-null `_id`.
#[must_use]
pub fn has_id(doc: &Document) -> bool {
    !matches!(doc.get(ID_FIELD), None | Some(Bson::Null))
}
