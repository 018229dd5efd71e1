use bson::{Bson, Document};
use serde_json::{Map, Value, json};

/// Convert a document into the plain JSON a schema is checked against.
///
/// Opaque BSON kinds have no JSON form of their own: object ids become their
/// hex string, date-times an RFC 3339 string, timestamps `{t, i}`, regular
/// expressions an empty object and anything else `null`.
#[must_use]
pub fn document_to_json(doc: &Document) -> Value {
    Value::Object(doc.iter().map(|(k, v)| (k.clone(), to_json(v))).collect::<Map<_, _>>())
}

#[must_use]
pub fn to_json(v: &Bson) -> Value {
    match v {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => json!(i),
        Bson::Int64(i) => json!(i),
        Bson::Double(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Bson::Decimal128(d) => d
            .to_string()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(to_json).collect()),
        Bson::Document(d) => document_to_json(d),
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map_or_else(|_| json!(dt.timestamp_millis()), Value::String),
        Bson::Timestamp(ts) => json!({"t": ts.time, "i": ts.increment}),
        Bson::RegularExpression(_) => Value::Object(Map::new()),
        Bson::Symbol(s) => Value::String(s.clone()),
        Bson::Binary(_)
        | Bson::JavaScriptCode(_)
        | Bson::JavaScriptCodeWithScope(_)
        | Bson::DbPointer(_)
        | Bson::MaxKey
        | Bson::MinKey => Value::Null,
    }
}
