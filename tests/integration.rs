//! Integration tests for Nagare
//!
//! End-to-end tests that load a persisted flow, drive it with commands and
//! persist the result.
//!
mod common;
use common::*;
use nagare::prelude::*;
use serde_json::json;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_order_flow_end_to_end() {
        let snapshot = GraphSnapshot::from_json(SNAPSHOT_JSON).expect("Failed to parse snapshot");
        let mut store = GraphStore::from_snapshot(snapshot, EngineConfig::default())
            .expect("Failed to load graph")
            .with_id_generator(SequentialIds::default());

        // Insert an approval step between the condition and the webhook.
        let outcome = store
            .apply(Command::SplitEdge {
                edge_id: "e2".to_string(),
                kind: NodeKind::Approval,
                position: Position::new(430.0, 60.0),
            })
            .expect("split should apply");
        let CommandOutcome::EdgeSplit { node_id: approval, .. } = outcome else {
            panic!("expected the split to report the new node");
        };
        // approvals route on named handles, so rewire the downstream edge
        let downstream = store.connectivity().outgoing_edges(&approval)[0].id.clone();
        store.disconnect(&downstream).unwrap();
        store
            .connect(&approval, "webhook1", Some("approved"), None)
            .unwrap();

        let report = push(&mut store, "trigger1", json!(250));
        assert_eq!(field_of(&store, &approval, "status"), &json!("pending"));
        assert!(report.effects.is_empty());

        let report = store
            .update_node_data(&approval, obj(json!({ "status": "approved" })))
            .unwrap();
        assert_eq!(report.effects.len(), 1);
        assert_eq!(report.effects[0].node_id, "webhook1");
        assert_eq!(field_of(&store, "webhook1", "status"), &json!("pending"));

        store
            .update_node_data("webhook1", obj(json!({ "status": "success" })))
            .unwrap();

        let saved = store.snapshot().to_json_pretty().expect("Failed to serialize");
        let reloaded = GraphStore::from_snapshot(
            GraphSnapshot::from_json(&saved).unwrap(),
            EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(field_of(&reloaded, "webhook1", "status"), &json!("success"));
        assert_eq!(reloaded.edges().len(), store.edges().len());
        println!("{}", saved);
    }

    #[test]
    fn test_small_trigger_does_not_reach_webhook() {
        let snapshot = GraphSnapshot::from_json(SNAPSHOT_JSON).unwrap();
        let mut store = GraphStore::from_snapshot(snapshot, EngineConfig::default()).unwrap();

        let report = push(&mut store, "trigger1", json!(20));
        assert_eq!(report.evaluations.len(), 1);
        assert!(!report.evaluations[0].passed);
        assert_eq!(field_of(&store, "webhook1", "status"), &json!("idle"));
        assert!(report.effects.is_empty());
    }
}
