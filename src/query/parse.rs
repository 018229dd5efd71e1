use bson::{Bson, Document};

use super::types::{CmpOp, Condition, FieldTest, LogicalOp};
use crate::document::{has_operator_key, is_operator};
use crate::errors::DocError;

/// Compile a condition tree. Every top-level entry becomes one conjunct.
///
/// # Errors
/// `UnknownOperator` for operator names outside the logical or field tables,
/// `MalformedOperator` for badly shaped logical operator arguments.
pub fn compile_condition(condition: &Document) -> Result<Condition, DocError> {
    let parts = condition
        .iter()
        .map(|(key, value)| {
            if is_operator(key) {
                compile_logical(key, value)
            } else {
                Ok(Condition::Field { path: key.clone(), test: compile_field_test(value)? })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Condition::And(parts))
}

fn compile_logical(key: &str, arg: &Bson) -> Result<Condition, DocError> {
    let op = LogicalOp::from_key(key).ok_or_else(|| DocError::UnknownOperator(key.to_string()))?;
    Ok(match op {
        LogicalOp::And => Condition::And(compile_list(op, arg)?),
        LogicalOp::Or => Condition::Or(compile_list(op, arg)?),
        LogicalOp::Nor => Condition::Nor(compile_list(op, arg)?),
        LogicalOp::Not => match arg {
            Bson::Document(sub) => Condition::Not(Box::new(compile_condition(sub)?)),
            _ => return Err(DocError::malformed(op.name(), "requires a condition document")),
        },
    })
}

fn compile_list(op: LogicalOp, arg: &Bson) -> Result<Vec<Condition>, DocError> {
    match arg {
        Bson::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| match item {
                Bson::Document(sub) => compile_condition(sub),
                _ => Err(DocError::malformed(op.name(), "array items must be condition documents")),
            })
            .collect(),
        _ => Err(DocError::malformed(op.name(), "requires nonempty array as argument")),
    }
}

/// Compile the right-hand side of a field condition.
///
/// A document with at least one operator key is a conjunction of field
/// operators; anything else is an implicit `$eq` target.
///
/// # Errors
/// `UnknownOperator` when an operator document holds a key outside `$eq,$gt,$lt`.
pub fn compile_field_test(value: &Bson) -> Result<FieldTest, DocError> {
    match value {
        Bson::Document(sub) if has_operator_key(sub) => sub
            .iter()
            .map(|(k, v)| {
                CmpOp::from_key(k)
                    .map(|op| (op, v.clone()))
                    .ok_or_else(|| DocError::UnknownOperator(k.clone()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldTest::Ops),
        other => Ok(FieldTest::Equals(other.clone())),
    }
}

/// # Errors
/// Returns an error if the JSON is not an object or the condition does not compile.
pub fn parse_condition_json(json: &str) -> Result<Condition, DocError> {
    let doc: Document = serde_json::from_str(json)?;
    compile_condition(&doc)
}
