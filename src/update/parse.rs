use bson::{Bson, Document};

use super::types::{UpdateMode, UpdateOperator, UpdateStep};
use crate::document::{has_operator_key, has_plain_key};
use crate::errors::DocError;
use crate::query::compile_field_test;

/// Classify an update document and compile its operators.
///
/// # Errors
/// `MixedUpdateModes`, `UnknownOperator`, or `MalformedOperator` when an
/// operator argument has the wrong shape.
pub fn compile_update(update: &Document) -> Result<UpdateMode, DocError> {
    if !has_operator_key(update) {
        return Ok(UpdateMode::Replace(update.clone()));
    }
    if has_plain_key(update) {
        return Err(DocError::MixedUpdateModes);
    }
    let ops = update
        .iter()
        .map(|(key, arg)| {
            UpdateOperator::from_key(key)
                .ok_or_else(|| DocError::UnknownOperator(key.clone()))
                .map(|op| (op, arg))
        })
        .collect::<Result<Vec<_>, _>>()?;
    ops.into_iter()
        .map(|(op, arg)| compile_step(op, arg))
        .collect::<Result<Vec<_>, _>>()
        .map(UpdateMode::Operators)
}

fn compile_step(op: UpdateOperator, arg: &Bson) -> Result<UpdateStep, DocError> {
    let Bson::Document(fields) = arg else {
        return Err(DocError::malformed(op.name(), "requires a document of field paths"));
    };
    let pairs = || fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>();
    Ok(match op {
        UpdateOperator::Set => UpdateStep::Set(pairs()),
        UpdateOperator::SetOnInsert => UpdateStep::SetOnInsert(pairs()),
        UpdateOperator::Inc => UpdateStep::Inc(pairs()),
        UpdateOperator::Mul => UpdateStep::Mul(pairs()),
        UpdateOperator::AddToSet => UpdateStep::AddToSet(pairs()),
        UpdateOperator::Unset => UpdateStep::Unset(fields.keys().cloned().collect()),
        UpdateOperator::Rename => UpdateStep::Rename(
            fields
                .iter()
                .map(|(k, v)| match v {
                    Bson::String(target) => Ok((k.clone(), target.clone())),
                    _ => Err(DocError::malformed(op.name(), format!("target for {k} must be a string"))),
                })
                .collect::<Result<_, _>>()?,
        ),
        UpdateOperator::Pull => UpdateStep::Pull(
            fields
                .iter()
                .map(|(k, v)| compile_field_test(v).map(|test| (k.clone(), test)))
                .collect::<Result<_, _>>()?,
        ),
    })
}
