//! Translation between the flat predicate and the nested JSON-Logic form
//! (`{">": [{"var": "value"}, 100]}`) some persisted condition nodes carry.

use super::ComparisonOperator;
use serde_json::{Map, Value, json};

/// A predicate recovered from its nested form.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatCondition {
    pub operator: ComparisonOperator,
    pub comparison_target: Value,
}

fn is_var(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.len() == 1 && obj.contains_key("var"))
}

/// Reads a single-comparison rule. Returns `None` for anything more complex
/// than one operator applied to one `var` and one literal.
pub fn from_json_logic(rule: &Value) -> Option<FlatCondition> {
    let obj = rule.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    let (symbol, args) = obj.iter().next()?;
    let operator: ComparisonOperator = symbol.parse().ok()?;
    let [left, right] = args.as_array()?.as_slice() else {
        return None;
    };

    match (is_var(left), is_var(right)) {
        (true, false) => Some(FlatCondition {
            operator,
            comparison_target: right.clone(),
        }),
        (false, true) => Some(FlatCondition {
            operator: operator.mirrored(),
            comparison_target: left.clone(),
        }),
        _ => None,
    }
}

/// Builds the nested form of `value <operator> target`.
pub fn to_json_logic(operator: ComparisonOperator, target: &Value) -> Value {
    let mut rule = Map::new();
    rule.insert(
        operator.symbol().to_string(),
        json!([{ "var": "value" }, target]),
    );
    Value::Object(rule)
}
