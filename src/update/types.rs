use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::query::FieldTest;

/// Options that change how an update treats a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    #[serde(default)]
    pub upsert: bool,
    #[serde(default)]
    pub multi: bool,
}

impl UpdateOptions {
    #[must_use]
    pub const fn upsert() -> Self {
        Self { upsert: true, multi: false }
    }

    #[must_use]
    pub const fn multi() -> Self {
        Self { upsert: false, multi: true }
    }
}

/// Update operators understood in operator mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Set,
    Unset,
    Rename,
    SetOnInsert,
    Inc,
    Mul,
    Pull,
    AddToSet,
}

impl UpdateOperator {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$set" => Some(Self::Set),
            "$unset" => Some(Self::Unset),
            "$rename" => Some(Self::Rename),
            "$setOnInsert" => Some(Self::SetOnInsert),
            "$inc" => Some(Self::Inc),
            "$mul" => Some(Self::Mul),
            "$pull" => Some(Self::Pull),
            "$addToSet" => Some(Self::AddToSet),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Set => "$set",
            Self::Unset => "$unset",
            Self::Rename => "$rename",
            Self::SetOnInsert => "$setOnInsert",
            Self::Inc => "$inc",
            Self::Mul => "$mul",
            Self::Pull => "$pull",
            Self::AddToSet => "$addToSet",
        }
    }
}

/// One operator of an operator-mode update with its per-field arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStep {
    Set(Vec<(String, Bson)>),
    Unset(Vec<String>),
    Rename(Vec<(String, String)>),
    SetOnInsert(Vec<(String, Bson)>),
    Inc(Vec<(String, Bson)>),
    Mul(Vec<(String, Bson)>),
    Pull(Vec<(String, FieldTest)>),
    AddToSet(Vec<(String, Bson)>),
}

/// How an update document was classified at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateMode {
    Replace(Document),
    Operators(Vec<UpdateStep>),
}
