//! Graph validation logic.

use std::collections::HashSet;

use crate::error::{GraphError, GraphResult};
use crate::graph::Edge;

/// Validate the graph structure: edge ids match their slots, endpoints
/// reference interned nodes, segment keys are unique.
pub(crate) fn validate_structure(nodes: &[String], edges: &[Edge]) -> GraphResult<()> {
    for (i, edge) in edges.iter().enumerate() {
        if edge.id.slot() != i {
            return Err(GraphError::IdNotFound { what: "EdgeId" });
        }
        for node in [edge.from, edge.to].into_iter().flatten() {
            if node.slot() >= nodes.len() {
                return Err(GraphError::DanglingNode {
                    edge: edge.id,
                    node,
                });
            }
        }
    }

    let mut keys = HashSet::new();
    for edge in edges {
        if !keys.insert(edge.key.as_str()) {
            return Err(GraphError::DuplicateEdge {
                key: edge.key.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dn_core::Id;

    #[test]
    fn validate_empty_graph() {
        assert!(validate_structure(&[], &[]).is_ok());
    }

    #[test]
    fn validate_dangling_node() {
        let nodes = vec!["A".to_string()];
        let edges = vec![Edge {
            id: Id::from_index(0),
            key: "s1".into(),
            from: Some(Id::from_index(0)),
            to: Some(Id::from_index(99)),
            order_hint: 0,
        }];
        assert!(matches!(
            validate_structure(&nodes, &edges),
            Err(GraphError::DanglingNode { .. })
        ));
    }

    #[test]
    fn validate_misnumbered_edge() {
        let edges = vec![Edge {
            id: Id::from_index(3),
            key: "s1".into(),
            from: None,
            to: None,
            order_hint: 0,
        }];
        assert!(validate_structure(&[], &edges).is_err());
    }
}
