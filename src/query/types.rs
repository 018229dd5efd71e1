use bson::Bson;

/// Top-level logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nor,
    Not,
}

impl LogicalOp {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$and" => Some(Self::And),
            "$or" => Some(Self::Or),
            "$nor" => Some(Self::Nor),
            "$not" => Some(Self::Not),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::And => "$and",
            Self::Or => "$or",
            Self::Nor => "$nor",
            Self::Not => "$not",
        }
    }
}

/// Field-level comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
    Lt,
}

impl CmpOp {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$eq" => Some(Self::Eq),
            "$gt" => Some(Self::Gt),
            "$lt" => Some(Self::Lt),
            _ => None,
        }
    }
}

/// How a single field is tested.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTest {
    /// Implicit `$eq` against a literal value.
    Equals(Bson),
    /// Conjunction of explicit operators.
    Ops(Vec<(CmpOp, Bson)>),
}

/// A compiled condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Nor(Vec<Condition>),
    Not(Box<Condition>),
    Field { path: String, test: FieldTest },
}
