//! Dotted field path resolution.
//!
//! Paths are split on `.`; every intermediate step must land on a plain
//! document. Arrays and opaque scalars stop a read walk and are overwritten by
//! a creating write walk.

use bson::{Bson, Document};

/// Locate the value at `path` for reading.
///
/// Returns `None` for an empty path, a missing key, or when an intermediate
/// value is not a document.
#[must_use]
pub fn resolve_read<'a>(path: &str, doc: &'a Document) -> Option<&'a Bson> {
    if path.is_empty() {
        return None;
    }
    let mut cur = doc;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        let value = cur.get(part)?;
        if parts.peek().is_none() {
            return Some(value);
        }
        match value {
            Bson::Document(d) => cur = d,
            _ => return None,
        }
    }
    None
}

/// Locate the document that owns the last segment of `path`.
///
/// With `create_missing`, any missing, null, or non-document intermediate is
/// replaced by an empty document. Without it the walk gives up with `None`.
pub fn resolve_container<'a>(
    path: &str,
    doc: &'a mut Document,
    create_missing: bool,
) -> Option<&'a mut Document> {
    let mut parents: Vec<&str> = path.split('.').collect();
    parents.pop();
    let mut cur = doc;
    for seg in parents {
        if !matches!(cur.get(seg), Some(Bson::Document(_))) {
            if !create_missing {
                return None;
            }
            cur.insert(seg, Document::new());
        }
        cur = match cur.get_mut(seg) {
            Some(Bson::Document(d)) => d,
            _ => return None,
        };
    }
    Some(cur)
}

/// The final dot-separated component of `path`.
#[must_use]
pub fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
