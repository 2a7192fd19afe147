//! Tests for graph mutations and their invariants.
use nagare::prelude::*;
use serde_json::json;

mod common;
use common::*;

#[cfg(test)]
mod add_remove_tests {
    use super::*;

    #[test]
    fn test_add_node_rejects_duplicate_id() {
        let mut store = store();
        store
            .add_node(node("a", NodeKind::Timeout, json!({ "value": 1 })))
            .unwrap();
        let before = store.snapshot();

        let err = store
            .add_node(node("a", NodeKind::Webhook, json!({})))
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateId("a".to_string()));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_add_node_fills_missing_label() {
        let mut store = store();
        store
            .add_node(node("w", NodeKind::Webhook, json!({ "url": "https://x" })))
            .unwrap();
        store
            .add_node(node("n", NodeKind::Notification, json!({ "label": "Ping ops" })))
            .unwrap();
        assert_eq!(store.node("w").unwrap().data.label(), Some("Webhook"));
        assert_eq!(store.node("n").unwrap().data.label(), Some("Ping ops"));
    }

    #[test]
    fn test_create_node_seeds_defaults() {
        let mut store = store();
        let id = store.create_node(NodeKind::Condition, Position::new(10.0, 20.0));
        assert_eq!(id, "condition-1");
        let node = store.node(&id).unwrap();
        assert_eq!(node.kind, NodeKind::Condition);
        assert_eq!(node.position, Position::new(10.0, 20.0));
        assert_eq!(node.data.operator(), Some(">"));
        assert_eq!(node.data.value(), None);
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut store = create_condition_flow();
        store.remove_node("cond1");

        assert!(store.node("cond1").is_none());
        assert!(store.edges().is_empty());
        assert!(store.source_nodes_of("notif1").is_empty());
        assert!(store.source_nodes_of("log1").is_empty());
    }

    #[test]
    fn test_remove_node_clears_sole_upstream_value() {
        let mut store = store();
        store
            .add_node(node("t", NodeKind::EventTrigger, json!({ "value": 7 })))
            .unwrap();
        store
            .add_node(node("x", NodeKind::Timeout, json!({})))
            .unwrap();
        store.connect("t", "x", None, None).unwrap();
        assert_eq!(value_of(&store, "x"), &json!(7));

        store.remove_node("t");
        assert_eq!(value_of(&store, "x"), &json!(null));
    }

    #[test]
    fn test_remove_node_keeps_value_with_other_upstream() {
        let mut store = store();
        store
            .add_node(node("t", NodeKind::EventTrigger, json!({ "value": 7 })))
            .unwrap();
        store
            .add_node(node("u", NodeKind::EventTrigger, json!({})))
            .unwrap();
        store
            .add_node(node("x", NodeKind::Timeout, json!({})))
            .unwrap();
        store.connect("t", "x", None, None).unwrap();
        store.connect("u", "x", None, None).unwrap();

        store.remove_node("t");
        assert_eq!(value_of(&store, "x"), &json!(7));
        assert_eq!(store.source_nodes_of("x").len(), 1);
    }

    #[test]
    fn test_remove_unknown_node_is_noop() {
        let mut store = create_condition_flow();
        let before = store.snapshot();
        let report = store.remove_node("nope");
        assert!(report.is_empty());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_clearing_value_propagates_nothing() {
        let mut store = store();
        store
            .add_node(node("t", NodeKind::EventTrigger, json!({ "value": 1 })))
            .unwrap();
        store
            .add_node(node("x", NodeKind::Timeout, json!({})))
            .unwrap();
        store
            .add_node(node("y", NodeKind::Timeout, json!({})))
            .unwrap();
        store.connect("t", "x", None, None).unwrap();
        store.connect("x", "y", None, None).unwrap();
        assert_eq!(value_of(&store, "y"), &json!(1));

        let report = store.remove_node("t");
        assert_eq!(value_of(&store, "x"), &json!(null));
        // y still has x upstream, and null is never pushed
        assert_eq!(value_of(&store, "y"), &json!(1));
        assert!(report.deliveries.is_empty());
    }
}

#[cfg(test)]
mod duplicate_move_tests {
    use super::*;

    #[test]
    fn test_duplicate_copies_config_and_resets_runtime() {
        let mut store = create_condition_flow();
        push(&mut store, "cond1", json!(150));
        assert_eq!(field_of(&store, "cond1", "result"), &json!(true));

        let copy_id = store.duplicate_node("cond1").unwrap();
        assert_ne!(copy_id, "cond1");
        let original = store.node("cond1").unwrap().clone();
        let copy = store.node(&copy_id).unwrap();

        assert_eq!(copy.kind, NodeKind::Condition);
        assert_eq!(copy.data.operator(), Some(">"));
        assert_eq!(copy.data.comparison_target(), &json!(100));
        assert_eq!(copy.data.label(), original.data.label());
        assert_eq!(copy.data.value(), None);
        assert_eq!(copy.data.get("result"), Some(&json!(null)));
        assert_eq!(copy.position, original.position.offset(Position::new(50.0, 50.0)));
        assert!(store.source_nodes_of(&copy_id).is_empty());
    }

    #[test]
    fn test_duplicate_resets_status() {
        let mut store = create_condition_flow();
        push(&mut store, "cond1", json!(150));
        assert_eq!(field_of(&store, "notif1", "status"), &json!("sending"));

        let copy_id = store.duplicate_node("notif1").unwrap();
        assert_eq!(field_of(&store, &copy_id, "status"), &json!("idle"));
        assert_eq!(field_of(&store, &copy_id, "value"), &json!(null));
    }

    #[test]
    fn test_duplicate_unknown_node() {
        let mut store = store();
        assert_eq!(store.duplicate_node("ghost"), None);
        assert!(store.nodes().is_empty());
    }

    #[test]
    fn test_move_node_never_propagates() {
        let mut store = create_filter_flow();
        assert!(store.move_node("filter1", Position::new(3.0, 4.0)));
        assert_eq!(store.node("filter1").unwrap().position, Position::new(3.0, 4.0));
        assert!(!store.move_node("ghost", Position::default()));
    }
}

#[cfg(test)]
mod edge_tests {
    use super::*;

    #[test]
    fn test_connect_unknown_node_leaves_state_unchanged() {
        let mut store = create_filter_flow();
        let before = store.snapshot();

        let err = store.connect("trigger1", "ghost", None, None).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("ghost".to_string()));
        let err = store.connect("ghost", "trigger1", None, None).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("ghost".to_string()));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_connect_from_live_source_delivers_immediately() {
        let mut store = store();
        store
            .add_node(node("src", NodeKind::EventTrigger, json!({ "value": 42 })))
            .unwrap();
        store
            .add_node(node("dst", NodeKind::Timeout, json!({})))
            .unwrap();

        let (edge_id, report) = store.connect("src", "dst", None, None).unwrap();
        assert_eq!(value_of(&store, "dst"), &json!(42));
        assert_eq!(report.delivered_to("dst"), Some(&json!(42)));
        assert_eq!(report.deliveries[0].edge_id, edge_id);
    }

    #[test]
    fn test_connect_only_delivers_along_new_edge() {
        let mut store = store();
        store
            .add_node(node("src", NodeKind::EventTrigger, json!({ "value": 1 })))
            .unwrap();
        store
            .add_node(node("old", NodeKind::AuditLog, json!({ "logs": [] })))
            .unwrap();
        store
            .add_node(node("new", NodeKind::AuditLog, json!({ "logs": [] })))
            .unwrap();
        store.connect("src", "old", None, None).unwrap();
        store.connect("src", "new", None, None).unwrap();

        assert_eq!(store.node("old").unwrap().data.logs().len(), 1);
        assert_eq!(store.node("new").unwrap().data.logs().len(), 1);
    }

    #[test]
    fn test_connect_on_unselected_branch_delivers_nothing() {
        let mut store = create_condition_flow();
        push(&mut store, "cond1", json!(150));
        store
            .add_node(node("late", NodeKind::Timeout, json!({})))
            .unwrap();

        let (_, report) = store.connect("cond1", "late", Some("false"), None).unwrap();
        assert!(report.deliveries.is_empty());
        assert_eq!(value_of(&store, "late"), &json!(null));
    }

    #[test]
    fn test_identical_connection_returns_existing_edge() {
        let mut store = create_condition_flow();
        let existing = store.edges()[0].id.clone();
        let (edge_id, _) = store.connect("cond1", "notif1", Some("true"), None).unwrap();
        assert_eq!(edge_id, existing);
        assert_eq!(store.edges().len(), 2);
    }

    #[test]
    fn test_repeated_connect_does_not_consume_edge_ids() {
        let mut store = create_condition_flow();
        assert_eq!(store.edges()[1].id, "e2");
        store.connect("cond1", "notif1", Some("true"), None).unwrap();
        store.connect("cond1", "notif1", Some("true"), None).unwrap();

        let (edge_id, _) = store.connect("cond1", "notif1", Some("false"), None).unwrap();
        assert_eq!(edge_id, "e3");
        assert_eq!(store.edges().len(), 3);
    }

    #[test]
    fn test_disconnect_clears_target() {
        let mut store = store();
        store
            .add_node(node("t", NodeKind::EventTrigger, json!({ "value": "on" })))
            .unwrap();
        store
            .add_node(node("x", NodeKind::Timeout, json!({})))
            .unwrap();
        let (edge_id, _) = store.connect("t", "x", None, None).unwrap();

        store.disconnect(&edge_id).unwrap();
        assert!(store.edges().is_empty());
        assert_eq!(value_of(&store, "x"), &json!(null));
    }

    #[test]
    fn test_disconnect_unknown_edge() {
        let mut store = create_condition_flow();
        let before = store.snapshot();
        assert_eq!(
            store.disconnect("e404").unwrap_err(),
            GraphError::UnknownEdge("e404".to_string())
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_split_edge_preserves_handles() {
        let mut store = create_condition_flow();
        let edge_id = store
            .edges()
            .iter()
            .find(|e| e.target == "notif1")
            .map(|e| e.id.clone())
            .unwrap();

        let (mid, _) = store
            .split_edge(&edge_id, NodeKind::Timeout, Position::new(1.0, 1.0))
            .unwrap();

        assert!(store.edge(&edge_id).is_none());
        let upstream = store.connectivity().incoming_edges(&mid)[0].clone();
        assert_eq!(upstream.source, "cond1");
        assert_eq!(upstream.source_handle(), Some("true"));
        let downstream = store.connectivity().outgoing_edges(&mid)[0].clone();
        assert_eq!(downstream.target, "notif1");
        assert_eq!(downstream.source_handle(), None);
        assert_eq!(downstream.target_handle(), None);
        assert_eq!(store.edges().len(), 3);
    }

    #[test]
    fn test_split_edge_carries_live_value() {
        let mut store = create_condition_flow();
        push(&mut store, "cond1", json!(150));
        let edge_id = store.edges()[0].id.clone();

        let (mid, report) = store
            .split_edge(&edge_id, NodeKind::Timeout, Position::default())
            .unwrap();
        assert_eq!(value_of(&store, &mid), &json!(150));
        assert_eq!(report.delivered_to("notif1"), Some(&json!(150)));
    }

    #[test]
    fn test_split_unknown_edge_leaves_state_unchanged() {
        let mut store = create_condition_flow();
        let before = store.snapshot();
        let err = store
            .split_edge("nope", NodeKind::Timeout, Position::default())
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownEdge("nope".to_string()));
        assert_eq!(store.snapshot(), before);
    }
}

#[cfg(test)]
mod update_tests {
    use super::*;

    #[test]
    fn test_update_merges_shallowly() {
        let mut store = create_filter_flow();
        store
            .update_node_data("timeout1", obj(json!({ "label": "Wait" })))
            .unwrap();
        let data = &store.node("timeout1").unwrap().data;
        assert_eq!(data.label(), Some("Wait"));
        assert_eq!(data.get("duration"), Some(&json!(5000)));
    }

    #[test]
    fn test_update_unknown_node() {
        let mut store = store();
        assert!(store
            .update_node_data("ghost", obj(json!({ "value": 1 })))
            .is_none());
    }

    #[test]
    fn test_non_output_field_does_not_propagate() {
        let mut store = create_filter_flow();
        push(&mut store, "trigger1", json!("idle"));
        let report = store
            .update_node_data("trigger1", obj(json!({ "eventType": "tick" })))
            .unwrap();
        assert!(report.deliveries.is_empty());
    }

    #[test]
    fn test_illegal_status_write_is_dropped_and_reported() {
        let mut store = store();
        store
            .add_node(node("hook", NodeKind::Webhook, json!({ "status": "idle" })))
            .unwrap();
        let report = store
            .update_node_data("hook", obj(json!({ "status": "success", "url": "https://x" })))
            .unwrap();

        assert_eq!(field_of(&store, "hook", "status"), &json!("idle"));
        assert_eq!(field_of(&store, "hook", "url"), &json!("https://x"));
        assert_eq!(report.rejected_transitions.len(), 1);
        assert_eq!(report.rejected_transitions[0].to, "success");
    }

    #[test]
    fn test_status_lifecycle_through_updates() {
        let mut store = store();
        store
            .add_node(node("hook", NodeKind::Webhook, json!({ "status": "idle" })))
            .unwrap();
        for status in ["pending", "error", "pending", "success", "idle"] {
            let report = store
                .update_node_data("hook", obj(json!({ "status": status })))
                .unwrap();
            assert!(report.rejected_transitions.is_empty(), "{} rejected", status);
            assert_eq!(field_of(&store, "hook", "status"), &json!(status));
        }
    }

    #[test]
    fn test_dangling_edges_are_tolerated() {
        let nodes = vec![
            node("a", NodeKind::EventTrigger, json!({})),
            node("b", NodeKind::Timeout, json!({})),
        ];
        let edges = vec![
            Edge::new("e1", "a", "b"),
            Edge::new("e2", "a", "ghost"),
            Edge::new("e3", "ghost", "b"),
            Edge::new("e4", "a", "b").with_handles(None, Some("in-2".to_string())),
        ];
        let index = ConnectivityIndex::new(&nodes, &edges);

        let targets: Vec<&str> = index.target_nodes_of("a")
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(targets, vec!["b"]);
        let sources: Vec<&str> = index.source_nodes_of("b")
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(sources, vec!["a"]);
        assert_eq!(index.outgoing_edges("a").len(), 2);
        assert!(index.has_upstream("b"));
        assert!(!index.has_upstream("a"));

        let dangling: Vec<&str> = index
            .dangling_edges()
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(dangling, vec!["e2", "e3"]);
    }
}

#[cfg(test)]
mod connectivity_tests {
    use super::*;

    #[test]
    fn test_wide_fan_out_resolves_every_target() {
        let mut store = store();
        store
            .add_node(node("hub", NodeKind::EventTrigger, json!({ "value": null })))
            .unwrap();
        for i in 0..500 {
            let id = format!("leaf{}", i);
            store
                .add_node(node(&id, NodeKind::Timeout, json!({})))
                .unwrap();
            store.connect("hub", &id, None, None).unwrap();
        }

        let report = push(&mut store, "hub", json!("go"));
        assert_eq!(report.deliveries.len(), 500);
        assert_eq!(store.target_nodes_of("hub").len(), 500);
        assert_eq!(store.source_nodes_of("leaf499")[0].id, "hub");

        let index = store.connectivity();
        assert!(index.has_upstream("leaf0"));
        assert!(!index.has_upstream("hub"));
        assert!(index.dangling_edges().is_empty());
        assert_eq!(value_of(&store, "leaf321"), &json!("go"));
    }
}
