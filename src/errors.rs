use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("malformed {operator} argument: {reason}")]
    MalformedOperator { operator: String, reason: String },

    #[error("operator {0} is not implemented")]
    UnknownOperator(String),

    #[error("update document is empty or missing")]
    EmptyOrMissingUpdate,

    #[error("update mixes operator and non-operator keys")]
    MixedUpdateModes,

    #[error("full document replace is not allowed in upsert + multi mode for a new document")]
    IllegalMultiUpsertReplace,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No schema for collection with enforced policy check")]
    NoSchema,

    #[error("Incorrect schema: {0}")]
    InvalidSchema(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl DocError {
    pub(crate) fn malformed(operator: &str, reason: impl Into<String>) -> Self {
        Self::MalformedOperator { operator: operator.to_string(), reason: reason.into() }
    }
}

impl From<std::io::Error> for DocError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
