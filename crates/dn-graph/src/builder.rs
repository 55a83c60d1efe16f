//! Incremental segment graph builder.

use std::collections::HashMap;

use dn_core::{EdgeId, NodeId};

use crate::error::GraphResult;
use crate::graph::{DuctEdge, Edge, SegmentGraph};
use crate::validate;

/// Builder for constructing a segment graph incrementally.
///
/// Component names are interned on first sight; segments keep their insertion
/// order so edge ids map straight back to the caller's slice.
#[derive(Debug, Default)]
pub struct SegmentGraphBuilder {
    nodes: Vec<String>,
    node_index: HashMap<String, NodeId>,
    edges: Vec<Edge>,
}

impl SegmentGraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from any slice of duct edges.
    pub fn from_edges<E: DuctEdge>(segments: &[E]) -> GraphResult<SegmentGraph> {
        let mut builder = Self::new();
        for seg in segments {
            builder.add_segment(
                seg.edge_key(),
                seg.from_component(),
                seg.to_component(),
                seg.order_hint(),
            );
        }
        builder.build()
    }

    fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_index.get(name) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(name.to_string());
        self.node_index.insert(name.to_string(), id);
        id
    }

    /// Add a segment and return its edge id.
    pub fn add_segment(
        &mut self,
        key: &str,
        from: Option<&str>,
        to: Option<&str>,
        order_hint: i64,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len() as u32);
        let from = from.map(|name| self.intern(name));
        let to = to.map(|name| self.intern(name));
        self.edges.push(Edge {
            id,
            key: key.to_string(),
            from,
            to,
            order_hint,
        });
        id
    }

    /// Validate and freeze the graph.
    pub fn build(self) -> GraphResult<SegmentGraph> {
        validate::validate_structure(&self.nodes, &self.edges)?;

        Ok(SegmentGraph {
            nodes: self.nodes,
            node_index: self.node_index,
            edges: self.edges,
        })
    }
}
