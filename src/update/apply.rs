use bson::{Bson, Document};

use super::types::{UpdateOptions, UpdateStep};
use crate::document::{ID_FIELD, deep_equal, has_id, last_segment, resolve_container};
use crate::errors::DocError;
use crate::query::{FieldTest, eval_field_test};
use crate::utils::num::{Number, coerce};

/// Build the document that replaces `doc` wholesale.
///
/// An `_id` carried by `doc` survives the replacement.
///
/// # Errors
/// `IllegalMultiUpsertReplace` for an upsert + multi replace of a document without `_id`.
pub fn apply_replace(
    replacement: &Document,
    doc: &Document,
    options: UpdateOptions,
) -> Result<Document, DocError> {
    if options.upsert && options.multi && !has_id(doc) {
        return Err(DocError::IllegalMultiUpsertReplace);
    }
    let mut out = replacement.clone();
    if let Some(id) = doc.get(ID_FIELD).filter(|id| !matches!(id, Bson::Null)) {
        out.insert(ID_FIELD, id.clone());
    }
    Ok(out)
}

/// Run one operator over every field it names, in order.
pub fn apply_step(step: &UpdateStep, doc: &mut Document, options: UpdateOptions) {
    match step {
        UpdateStep::Set(fields) => {
            for (path, value) in fields {
                set_field(doc, path, value.clone());
            }
        }
        UpdateStep::SetOnInsert(fields) => {
            if options.upsert && !doc.contains_key(ID_FIELD) {
                for (path, value) in fields {
                    set_field(doc, path, value.clone());
                }
            }
        }
        UpdateStep::Unset(paths) => {
            for path in paths {
                take_field(doc, path);
            }
        }
        UpdateStep::Rename(pairs) => {
            for (from, to) in pairs {
                if let Some(value) = take_field(doc, from) {
                    set_field(doc, to, value);
                }
            }
        }
        UpdateStep::Inc(fields) => {
            for (path, arg) in fields {
                arith_field(doc, path, arg, |cur, arg| cur.add(arg));
            }
        }
        UpdateStep::Mul(fields) => {
            for (path, arg) in fields {
                arith_field(doc, path, arg, |cur, arg| cur.mul(arg));
            }
        }
        UpdateStep::Pull(fields) => {
            for (path, test) in fields {
                pull_field(doc, path, test);
            }
        }
        UpdateStep::AddToSet(fields) => {
            for (path, value) in fields {
                add_to_set_field(doc, path, value);
            }
        }
    }
}

fn set_field(doc: &mut Document, path: &str, value: Bson) {
    if let Some(container) = resolve_container(path, doc, true) {
        container.insert(last_segment(path), value);
    }
}

fn take_field(doc: &mut Document, path: &str) -> Option<Bson> {
    resolve_container(path, doc, false).and_then(|c| c.remove(last_segment(path)))
}

fn arith_field(
    doc: &mut Document,
    path: &str,
    arg: &Bson,
    op: fn(Number, Number) -> Number,
) {
    let Some(container) = resolve_container(path, doc, true) else {
        return;
    };
    let key = last_segment(path);
    let result = op(coerce(container.get(key)), coerce(Some(arg)));
    container.insert(key, result);
}

fn pull_field(doc: &mut Document, path: &str, test: &FieldTest) {
    let Some(container) = resolve_container(path, doc, false) else {
        return;
    };
    if let Some(Bson::Array(items)) = container.get_mut(last_segment(path)) {
        items.retain(|item| !eval_field_test(Some(item), test));
    }
}

fn add_to_set_field(doc: &mut Document, path: &str, value: &Bson) {
    let Some(container) = resolve_container(path, doc, true) else {
        return;
    };
    let key = last_segment(path);
    if !matches!(container.get(key), Some(Bson::Array(_))) {
        container.insert(key, Bson::Array(Vec::new()));
    }
    if let Some(Bson::Array(items)) = container.get_mut(key)
        && !items.iter().any(|item| deep_equal(value, Some(item)))
    {
        items.push(value.clone());
    }
}
