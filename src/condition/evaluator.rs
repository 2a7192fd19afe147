use super::coercion::{format_number, string_to_number, to_number, to_text};
use super::{ComparisonOperator, ValueType};
use crate::model::NodeData;
use serde_json::Value;
use std::fmt;

/// A value after coercion to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Text(String),
}

impl Operand {
    pub fn coerce(value: &Value, value_type: ValueType) -> Operand {
        match value_type {
            ValueType::Number => Operand::Number(to_number(value)),
            ValueType::Text => Operand::Text(to_text(value)),
        }
    }

    /// The numeric reading of this operand, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Operand::Number(n) => *n,
            Operand::Text(s) => string_to_number(s),
        };
        (!n.is_nan()).then_some(n)
    }

    pub fn as_text(&self) -> String {
        match self {
            Operand::Number(n) => format_number(*n),
            Operand::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Evaluates `value <operator> target` after coercing both sides to `declared_type`.
///
/// When both coerced operands read as numbers the comparison is numeric,
/// otherwise it is textual, so `"10" > "9"` holds even for text-typed nodes.
/// An unknown operator never matches.
pub fn evaluate(value: &Value, operator: &str, target: &Value, declared_type: &str) -> bool {
    match operator.parse::<ComparisonOperator>() {
        Ok(op) => evaluate_with(value, op, target, ValueType::from_declared(Some(declared_type))),
        Err(_) => false,
    }
}

/// Typed form of [`evaluate`].
pub fn evaluate_with(
    value: &Value,
    operator: ComparisonOperator,
    target: &Value,
    value_type: ValueType,
) -> bool {
    let left = Operand::coerce(value, value_type);
    let right = Operand::coerce(target, value_type);

    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => operator.compare_numbers(a, b),
        _ => operator.compare_text(&left.as_text(), &right.as_text()),
    }
}

/// The flat predicate a gating node is configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub operator: Option<ComparisonOperator>,
    pub target: Value,
    pub value_type: ValueType,
}

impl Predicate {
    /// Reads `operator`, `comparisonTarget` (or `filterValue`) and `valueType`.
    pub fn from_data(data: &NodeData) -> Predicate {
        Predicate {
            operator: data.operator().and_then(|op| op.parse().ok()),
            target: data.comparison_target().clone(),
            value_type: ValueType::from_declared(data.value_type()),
        }
    }

    /// A predicate with a missing or unknown operator never passes.
    pub fn test(&self, value: &Value) -> bool {
        match self.operator {
            Some(op) => evaluate_with(value, op, &self.target, self.value_type),
            None => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operator.map_or("?", |op| op.symbol());
        write!(
            f,
            "value {} {} ({})",
            op,
            Operand::coerce(&self.target, self.value_type),
            self.value_type
        )
    }
}
