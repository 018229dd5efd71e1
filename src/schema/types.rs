use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::document::ID_FIELD;
use crate::errors::DocError;

/// Pattern every stored `_id` must satisfy once normalized to a string.
pub const OBJECT_ID_PATTERN: &str = "^[0-9a-f]{24}$";

/// A JSON Schema document used to check documents before they are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    raw: Value,
}

impl Schema {
    #[must_use]
    pub const fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// # Errors
    /// Returns an error if the text is not JSON.
    pub fn from_json(json: &str) -> Result<Self, DocError> {
        Ok(Self { raw: serde_json::from_str(json)? })
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.raw
    }

    /// True when the top-level `type` is exactly `"object"`.
    #[must_use]
    pub fn describes_object(&self) -> bool {
        self.raw.get("type").and_then(Value::as_str) == Some("object")
    }

    /// The subschema declared for a top-level property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.raw.get("properties").and_then(|p| p.get(name))
    }

    /// Copy of this schema that also accepts a stored `_id`.
    ///
    /// Collections always carry `_id`, so the copy declares it as a 24 digit
    /// lowercase hex string, the normalized form of an object id.
    ///
    /// # Errors
    /// `InvalidSchema` unless the schema describes an object.
    pub fn with_id_field(&self) -> Result<Self, DocError> {
        if !self.describes_object() {
            return Err(DocError::InvalidSchema("top-level type must be object".into()));
        }
        let mut raw = self.raw.clone();
        let properties = raw
            .as_object_mut()
            .map(|o| o.entry("properties").or_insert_with(|| json!({})))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| DocError::InvalidSchema("properties must be an object".into()))?;
        properties.insert(
            ID_FIELD.to_string(),
            json!({"type": "string", "pattern": OBJECT_ID_PATTERN}),
        );
        Ok(Self { raw })
    }
}

impl From<Value> for Schema {
    fn from(raw: Value) -> Self {
        Self::from_value(raw)
    }
}
