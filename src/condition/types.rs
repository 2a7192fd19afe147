use crate::error::UnknownOperator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operators available to condition and filter nodes.
///
/// Loose (`==`, `!=`) and strict (`===`, `!==`) equality are kept as distinct
/// operators even though both sides are coerced to the same type first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    SmallerThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    SmallerThanOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "===")]
    StrictEqual,
    #[serde(rename = "!==")]
    StrictNotEqual,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 8] = [
        ComparisonOperator::GreaterThan,
        ComparisonOperator::SmallerThan,
        ComparisonOperator::GreaterThanOrEqual,
        ComparisonOperator::SmallerThanOrEqual,
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::StrictEqual,
        ComparisonOperator::StrictNotEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::SmallerThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::SmallerThanOrEqual => "<=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::StrictEqual => "===",
            ComparisonOperator::StrictNotEqual => "!==",
        }
    }

    /// The operator that gives the same answer with its operands swapped.
    pub fn mirrored(&self) -> ComparisonOperator {
        match self {
            ComparisonOperator::GreaterThan => ComparisonOperator::SmallerThan,
            ComparisonOperator::SmallerThan => ComparisonOperator::GreaterThan,
            ComparisonOperator::GreaterThanOrEqual => ComparisonOperator::SmallerThanOrEqual,
            ComparisonOperator::SmallerThanOrEqual => ComparisonOperator::GreaterThanOrEqual,
            symmetric => *symmetric,
        }
    }

    pub(crate) fn compare_numbers(&self, a: f64, b: f64) -> bool {
        match self {
            ComparisonOperator::GreaterThan => a > b,
            ComparisonOperator::SmallerThan => a < b,
            ComparisonOperator::GreaterThanOrEqual => a >= b,
            ComparisonOperator::SmallerThanOrEqual => a <= b,
            ComparisonOperator::Equal | ComparisonOperator::StrictEqual => a == b,
            ComparisonOperator::NotEqual | ComparisonOperator::StrictNotEqual => a != b,
        }
    }

    /// Text ordering is by UTF-16 code units.
    pub(crate) fn compare_text(&self, a: &str, b: &str) -> bool {
        let ordering = a.encode_utf16().cmp(b.encode_utf16());
        match self {
            ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
            ComparisonOperator::SmallerThan => ordering == Ordering::Less,
            ComparisonOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            ComparisonOperator::SmallerThanOrEqual => ordering != Ordering::Greater,
            ComparisonOperator::Equal | ComparisonOperator::StrictEqual => a == b,
            ComparisonOperator::NotEqual | ComparisonOperator::StrictNotEqual => a != b,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ComparisonOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonOperator::ALL
            .iter()
            .copied()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// The declared type both operands are coerced to before comparing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    #[default]
    Text,
}

impl ValueType {
    /// Anything other than `"number"` (including a missing type) coerces as text.
    pub fn from_declared(declared: Option<&str>) -> ValueType {
        match declared {
            Some("number") => ValueType::Number,
            _ => ValueType::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Text => "text",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
