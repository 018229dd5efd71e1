use bson::{Bson, Document};
use std::cmp::Ordering;

use super::types::{CmpOp, Condition, FieldTest};
use crate::document::{compare_values, deep_equal, resolve_read};

pub fn eval_condition(doc: &Document, condition: &Condition) -> bool {
    match condition {
        Condition::And(cs) => cs.iter().all(|c| eval_condition(doc, c)),
        Condition::Or(cs) => cs.iter().any(|c| eval_condition(doc, c)),
        Condition::Nor(cs) => !cs.iter().any(|c| eval_condition(doc, c)),
        Condition::Not(c) => !eval_condition(doc, c),
        Condition::Field { path, test } => eval_field_test(resolve_read(path, doc), test),
    }
}

/// Test a single (possibly missing) value against a compiled field test.
pub fn eval_field_test(value: Option<&Bson>, test: &FieldTest) -> bool {
    match test {
        FieldTest::Equals(target) => deep_equal(target, value),
        FieldTest::Ops(ops) => ops.iter().all(|(op, target)| eval_cmp(*op, target, value)),
    }
}

fn eval_cmp(op: CmpOp, target: &Bson, value: Option<&Bson>) -> bool {
    match op {
        CmpOp::Eq => deep_equal(target, value),
        CmpOp::Gt => {
            value.is_some_and(|v| compare_values(v, target) == Some(Ordering::Greater))
        }
        CmpOp::Lt => value.is_some_and(|v| compare_values(v, target) == Some(Ordering::Less)),
    }
}
