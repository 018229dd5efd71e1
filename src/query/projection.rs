use bson::{Bson, Document};

use crate::document::is_operator;

/// Keep only the parts of a condition defined by direct equality.
///
/// Operator keys are dropped, nested condition documents are projected
/// recursively and kept only when something survives. The result is the base
/// document an upsert starts from when nothing matched.
#[must_use]
pub fn equality_projection(condition: &Document) -> Document {
    let mut out = Document::new();
    for (key, value) in condition {
        if is_operator(key) {
            continue;
        }
        match value {
            Bson::Document(sub) => {
                let projected = equality_projection(sub);
                if !projected.is_empty() {
                    out.insert(key.clone(), projected);
                }
            }
            other => {
                out.insert(key.clone(), other.clone());
            }
        }
    }
    out
}
