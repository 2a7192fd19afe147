use crate::model::NodeKind;
use uuid::Uuid;

/// Source of fresh node and edge ids.
///
/// The store re-draws an id if the generator hands out one already in use.
pub trait IdGenerator: Send {
    fn node_id(&mut self, kind: NodeKind) -> String;
    fn edge_id(&mut self, source: &str, target: &str) -> String;
}

/// Random ids, e.g. `condition-1b4e28ba2fa1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn node_id(&mut self, kind: NodeKind) -> String {
        format!("{}-{}", kind.as_str(), short_uuid())
    }

    fn edge_id(&mut self, source: &str, target: &str) -> String {
        format!("edge-{}-{}-{}", source, target, short_uuid())
    }
}

fn short_uuid() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    simple[..12].to_string()
}

/// Predictable ids (`condition-1`, `e1`), for tooling and reproducible runs.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next_node: u64,
    next_edge: u64,
}

impl IdGenerator for SequentialIds {
    fn node_id(&mut self, kind: NodeKind) -> String {
        self.next_node += 1;
        format!("{}-{}", kind.as_str(), self.next_node)
    }

    fn edge_id(&mut self, _source: &str, _target: &str) -> String {
        self.next_edge += 1;
        format!("e{}", self.next_edge)
    }
}
