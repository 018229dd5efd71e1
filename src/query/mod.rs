//! Condition matching for MongoDB-style condition trees.
//!
//! A condition is compiled once into a [`Condition`] tree, so that every
//! operator error is reported before any document is looked at, and then
//! evaluated against as many documents as needed.

mod eval;
mod parse;
mod projection;
mod types;

pub use eval::{eval_condition, eval_field_test};
pub use parse::{compile_condition, compile_field_test, parse_condition_json};
pub use projection::equality_projection;
pub use types::{CmpOp, Condition, FieldTest, LogicalOp};

use bson::Document;

use crate::errors::DocError;

/// A compiled condition ready to test documents.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    condition: Condition,
}

impl QueryMatcher {
    /// # Errors
    /// `UnknownOperator` or `MalformedOperator` when the condition is not valid.
    pub fn new(condition: &Document) -> Result<Self, DocError> {
        let condition = compile_condition(condition)?;
        log::debug!("compiled condition: {condition:?}");
        Ok(Self { condition })
    }

    /// # Errors
    /// Returns an error if the JSON cannot be parsed or the condition is not valid.
    pub fn from_json(json: &str) -> Result<Self, DocError> {
        Ok(Self { condition: parse_condition_json(json)? })
    }

    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        eval_condition(doc, &self.condition)
    }

    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }
}

/// One-shot form of [`QueryMatcher::matches`].
///
/// # Errors
/// `UnknownOperator` or `MalformedOperator` when the condition is not valid.
pub fn matches(condition: &Document, doc: &Document) -> Result<bool, DocError> {
    Ok(QueryMatcher::new(condition)?.matches(doc))
}
