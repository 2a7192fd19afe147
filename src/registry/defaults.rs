use crate::model::NodeKind;
use serde_json::{Map, Value, json};

/// The built-in data record a palette drop of `kind` starts from.
pub fn builtin_default(kind: NodeKind) -> Map<String, Value> {
    let literal = match kind {
        NodeKind::EventTrigger => json!({
            "label": "Event Trigger",
            "status": "idle",
            "eventType": "",
            "value": null,
        }),
        NodeKind::DateTime => json!({
            "label": "Date & Time",
            "status": "idle",
            "dateTime": "",
            "repeat": "none",
            "value": null,
        }),
        NodeKind::Condition => json!({
            "label": "Condition",
            "operator": ">",
            "comparisonTarget": "",
            "valueType": "number",
            "value": null,
            "result": null,
        }),
        NodeKind::Filter => json!({
            "label": "Filter",
            "operator": "==",
            "comparisonTarget": "",
            "valueType": "text",
            "value": null,
            "result": null,
        }),
        NodeKind::Timeout => json!({
            "label": "Timeout",
            "duration": 5000,
            "status": "idle",
            "value": null,
        }),
        NodeKind::Approval => json!({
            "label": "Approval",
            "approvers": [],
            "status": "idle",
            "value": null,
        }),
        NodeKind::RateLimit => json!({
            "label": "Rate Limit",
            "limit": 10,
            "interval": 60000,
            "count": 0,
            "status": "idle",
            "value": null,
        }),
        NodeKind::Notification => json!({
            "label": "Notification",
            "channel": "email",
            "recipient": "",
            "message": "",
            "status": "idle",
            "value": null,
        }),
        NodeKind::Webhook => json!({
            "label": "Webhook",
            "url": "",
            "method": "POST",
            "headers": {},
            "status": "idle",
            "value": null,
        }),
        NodeKind::AuditLog => json!({
            "label": "Audit Log",
            "logs": [],
            "value": null,
        }),
        NodeKind::Debugger => json!({
            "label": "Debugger",
            "logs": [],
            "value": null,
        }),
        NodeKind::AiAnalysis => json!({
            "label": "AI Analysis",
            "model": "",
            "prompt": "",
            "status": "idle",
            "value": null,
        }),
    };

    match literal {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
