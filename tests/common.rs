//! Common test utilities for building flow graphs.
use nagare::prelude::*;
use serde_json::{Map, Value, json};

/// Turns a `json!` object literal into a data map.
#[allow(dead_code)]
pub fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

#[allow(dead_code)]
pub fn data(value: Value) -> NodeData {
    NodeData::from(obj(value))
}

#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind, value: Value) -> Node {
    Node::new(id, kind, data(value))
}

/// A store with predictable ids.
#[allow(dead_code)]
pub fn store() -> GraphStore {
    GraphStore::new().with_id_generator(SequentialIds::default())
}

/// Sets `data.value` on a node and returns the propagation report.
#[allow(dead_code)]
pub fn push(store: &mut GraphStore, id: &str, value: Value) -> PropagationReport {
    store
        .update_node_data(id, obj(json!({ "value": value })))
        .expect("node should exist")
}

#[allow(dead_code)]
pub fn value_of<'a>(store: &'a GraphStore, id: &str) -> &'a Value {
    store
        .node(id)
        .and_then(|n| n.data.get("value"))
        .unwrap_or(&Value::Null)
}

#[allow(dead_code)]
pub fn field_of<'a>(store: &'a GraphStore, id: &str, field: &str) -> &'a Value {
    store
        .node(id)
        .and_then(|n| n.data.get(field))
        .unwrap_or(&Value::Null)
}

/// `cond1` (`value > 100`, number) routing `true` to `notif1` and `false` to `log1`.
#[allow(dead_code)]
pub fn create_condition_flow() -> GraphStore {
    let mut store = store();
    store
        .add_node(node(
            "cond1",
            NodeKind::Condition,
            json!({
                "operator": ">",
                "comparisonTarget": 100,
                "valueType": "number",
                "value": null
            }),
        ))
        .unwrap();
    store
        .add_node(node("notif1", NodeKind::Notification, json!({ "status": "idle" })))
        .unwrap();
    store
        .add_node(node("log1", NodeKind::AuditLog, json!({ "logs": [] })))
        .unwrap();
    store.connect("cond1", "notif1", Some("true"), None).unwrap();
    store.connect("cond1", "log1", Some("false"), None).unwrap();
    store
}

/// `trigger1 -> filter1 -> timeout1`, with `filter1` passing only `"idle"`.
#[allow(dead_code)]
pub fn create_filter_flow() -> GraphStore {
    let mut store = store();
    store
        .add_node(node("trigger1", NodeKind::EventTrigger, json!({ "value": null })))
        .unwrap();
    store
        .add_node(node(
            "filter1",
            NodeKind::Filter,
            json!({ "operator": "==", "filterValue": "idle", "valueType": "text" }),
        ))
        .unwrap();
    store
        .add_node(node("timeout1", NodeKind::Timeout, json!({ "duration": 5000 })))
        .unwrap();
    store.connect("trigger1", "filter1", None, None).unwrap();
    store.connect("filter1", "timeout1", None, None).unwrap();
    store
}

/// A persisted graph with presentation fields the engine does not interpret.
#[allow(dead_code)]
pub const SNAPSHOT_JSON: &str = r##"{
  "nodes": [
    {
      "id": "trigger1",
      "type": "eventTrigger",
      "position": { "x": 100, "y": 80 },
      "data": { "label": "Order placed", "eventType": "order.created", "value": 150 },
      "width": 180,
      "selected": false
    },
    {
      "id": "cond1",
      "type": "condition",
      "position": { "x": 320, "y": 80 },
      "data": {
        "label": "Large order",
        "condition": { ">": [{ "var": "value" }, 100] },
        "valueType": "number"
      }
    },
    {
      "id": "webhook1",
      "type": "webhook",
      "position": { "x": 540, "y": 40 },
      "data": {
        "url": "https://example.com/hook",
        "method": "POST",
        "status": "idle"
      }
    }
  ],
  "edges": [
    { "id": "e1", "source": "trigger1", "target": "cond1", "type": "smoothstep", "animated": true },
    { "id": "e2", "source": "cond1", "target": "webhook1", "sourceHandle": "true", "style": { "stroke": "#888" } },
    { "id": "e3", "source": "cond1", "target": "ghost" }
  ]
}"##;
