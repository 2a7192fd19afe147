use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const LABEL: &str = "label";
pub const VALUE: &str = "value";
pub const STATUS: &str = "status";
pub const OPERATOR: &str = "operator";
pub const COMPARISON_TARGET: &str = "comparisonTarget";
/// Older filter nodes store their comparison target under this key.
pub const FILTER_VALUE: &str = "filterValue";
pub const VALUE_TYPE: &str = "valueType";
pub const RESULT: &str = "result";
pub const LOGS: &str = "logs";
pub const COUNT: &str = "count";
pub const LIMIT: &str = "limit";
pub const CONDITION: &str = "condition";

/// The type-specific data record of a node.
///
/// Stored as an ordered JSON object so that fields the engine does not know
/// about survive a load/save round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeData(Map<String, Value>);

impl NodeData {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Shallow merge: every key of `partial` overwrites, all other keys stay.
    pub fn merge(&mut self, partial: &Map<String, Value>) {
        for (key, value) in partial {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.0.get(LABEL).and_then(Value::as_str)
    }

    /// The live value, treating an explicit `null` as absent.
    pub fn value(&self) -> Option<&Value> {
        self.0.get(VALUE).filter(|v| !v.is_null())
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get(STATUS).and_then(Value::as_str)
    }

    pub fn operator(&self) -> Option<&str> {
        self.0.get(OPERATOR).and_then(Value::as_str)
    }

    /// The comparison target of a gating node, falling back to `filterValue`.
    pub fn comparison_target(&self) -> &Value {
        self.0
            .get(COMPARISON_TARGET)
            .or_else(|| self.0.get(FILTER_VALUE))
            .unwrap_or(&Value::Null)
    }

    pub fn value_type(&self) -> Option<&str> {
        self.0.get(VALUE_TYPE).and_then(Value::as_str)
    }

    pub fn count(&self) -> u64 {
        self.0.get(COUNT).and_then(Value::as_u64).unwrap_or(0)
    }

    pub fn limit(&self) -> Option<u64> {
        self.0.get(LIMIT).and_then(Value::as_u64)
    }

    pub fn logs(&self) -> &[Value] {
        self.0
            .get(LOGS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl From<Map<String, Value>> for NodeData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<NodeData> for Value {
    fn from(data: NodeData) -> Self {
        Value::Object(data.0)
    }
}
