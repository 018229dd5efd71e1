use bson::{Bson, Document};
use std::cmp::Ordering;

use crate::utils::num::numeric_value;

/// Structural equality as used by `$eq`, `$pull` and `$addToSet`.
///
/// Documents must have the same key count and recursively equal values, in any
/// key order. Arrays must match element by element. Numbers compare by value
/// across BSON numeric types. A missing `actual` equals nothing.
#[must_use]
pub fn deep_equal(target: &Bson, actual: Option<&Bson>) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    match (target, actual) {
        (Bson::Document(t), Bson::Document(a)) => documents_equal(t, a),
        (Bson::Document(_), _) | (_, Bson::Document(_)) => false,
        (Bson::Array(t), Bson::Array(a)) => {
            t.len() == a.len() && t.iter().zip(a).all(|(x, y)| deep_equal(x, Some(y)))
        }
        (Bson::Array(_), _) | (_, Bson::Array(_)) => false,
        (Bson::DateTime(t), Bson::DateTime(a)) => t.timestamp_millis() == a.timestamp_millis(),
        (Bson::Timestamp(t), Bson::Timestamp(a)) => {
            t.time == a.time && t.increment == a.increment
        }
        _ => match (numeric_value(target), numeric_value(actual)) {
            (Some(x), Some(y)) => x == y,
            (None, None) => target == actual,
            _ => false,
        },
    }
}

fn documents_equal(target: &Document, actual: &Document) -> bool {
    target.len() == actual.len() && target.iter().all(|(k, v)| deep_equal(v, actual.get(k)))
}

/// Ordering used by `$lt` and `$gt`.
///
/// Only like kinds are ordered: numbers, strings, booleans, date-times and
/// timestamps. Every other pairing is unordered.
#[must_use]
pub fn compare_values(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (numeric_value(a), numeric_value(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => {
            Some(x.timestamp_millis().cmp(&y.timestamp_millis()))
        }
        (Bson::Timestamp(x), Bson::Timestamp(y)) => {
            Some((x.time, x.increment).cmp(&(y.time, y.increment)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{DateTime, Timestamp, doc, oid::ObjectId};

    fn eq(a: Bson, b: Bson) -> bool {
        deep_equal(&a, Some(&b))
    }

    #[test]
    fn primitives() {
        assert!(eq(1.into(), 1.into()));
        assert!(!eq(1.into(), 2.into()));
        assert!(eq("zz".into(), "zz".into()));
        assert!(!eq("zz".into(), "zzz".into()));
        assert!(eq(true.into(), true.into()));
        assert!(!eq(true.into(), false.into()));
        assert!(eq(Bson::Null, Bson::Null));
        assert!(!eq(Bson::Null, true.into()));
        assert!(!eq(Bson::Null, 1.into()));
        assert!(!eq(Bson::Null, Bson::Document(doc! {})));
    }

    #[test]
    fn numbers_compare_across_types() {
        assert!(eq(Bson::Int32(5), Bson::Double(5.0)));
        assert!(eq(Bson::Int64(5), Bson::Int32(5)));
        assert!(!eq(Bson::Double(f64::NAN), Bson::Double(f64::NAN)));
        assert!(!eq(Bson::Int32(1), "1".into()));
    }

    #[test]
    fn opaque_scalars() {
        let id = ObjectId::new();
        let same = ObjectId::parse_str(id.to_hex()).ok();
        assert!(eq(id.into(), id.into()));
        assert_eq!(same.map(|s| eq(id.into(), s.into())), Some(true));
        assert!(!eq(id.into(), ObjectId::new().into()));
        assert!(eq(DateTime::from_millis(0).into(), DateTime::from_millis(0).into()));
        assert!(!eq(DateTime::from_millis(0).into(), DateTime::from_millis(1).into()));
        let ts = |t, i| Bson::Timestamp(Timestamp { time: t, increment: i });
        assert!(eq(ts(1, 2), ts(1, 2)));
        assert!(!eq(ts(1, 2), ts(1, 3)));
    }

    #[test]
    fn arrays_are_order_sensitive() {
        let id = ObjectId::new();
        assert!(eq(Bson::Array(vec![]), Bson::Array(vec![])));
        assert!(!eq(Bson::Array(vec![]), Bson::Document(doc! {})));
        assert!(!eq(Bson::Document(doc! {}), Bson::Array(vec![])));
        assert!(!eq(Bson::Array(vec![]), 1.into()));
        assert!(eq(bson::bson!([1, "zzz", id]), bson::bson!([1, "zzz", id])));
        assert!(!eq(bson::bson!([1, "zzz"]), bson::bson!([1, "zzz", id])));
        assert!(!eq(bson::bson!(["zzz", 1, id]), bson::bson!([1, "zzz", id])));
    }

    #[test]
    fn documents_ignore_key_order_but_not_extra_keys() {
        assert!(eq(Bson::Document(doc! {}), Bson::Document(doc! {})));
        assert!(eq(
            Bson::Document(doc! {"x": 1, "y": {"z": [1, 2]}}),
            Bson::Document(doc! {"y": {"z": [1, 2]}, "x": 1})
        ));
        assert!(!eq(Bson::Document(doc! {"b": 123}), Bson::Document(doc! {"b": 123, "c": 555})));
        assert!(!eq(Bson::Document(doc! {"b": 123, "c": 555}), Bson::Document(doc! {"b": 123})));
        assert!(!eq(Bson::Document(doc! {"b": 123}), Bson::Document(doc! {"c": 123})));
    }

    #[test]
    fn missing_equals_nothing() {
        assert!(!deep_equal(&Bson::Null, None));
        assert!(!deep_equal(&Bson::Document(doc! {}), None));
    }

    #[test]
    fn ordering_of_like_kinds_only() {
        assert_eq!(compare_values(&3.into(), &Bson::Double(5.5)), Some(Ordering::Less));
        assert_eq!(compare_values(&"b".into(), &"a".into()), Some(Ordering::Greater));
        assert_eq!(
            compare_values(&DateTime::from_millis(5).into(), &DateTime::from_millis(5).into()),
            Some(Ordering::Equal)
        );
        assert_eq!(compare_values(&1.into(), &"1".into()), None);
        assert_eq!(compare_values(&Bson::Null, &Bson::Null), None);
        assert_eq!(compare_values(&Bson::Double(f64::NAN), &1.into()), None);
    }
}
