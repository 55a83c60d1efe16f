//! Core segment graph data structures.

use std::collections::HashMap;

use dn_core::{EdgeId, NodeId};

/// Anything that can be placed in the segment graph: a directed duct run
/// between two (optional) component endpoints, with a stored order hint.
pub trait DuctEdge {
    /// Stable key of the segment (unique within one path).
    fn edge_key(&self) -> &str;

    /// Upstream component, if the segment is connected there.
    fn from_component(&self) -> Option<&str>;

    /// Downstream component, if the segment is connected there.
    fn to_component(&self) -> Option<&str>;

    /// Order the segment was stored with. Only trusted as a fallback.
    fn order_hint(&self) -> i64;
}

impl<T: DuctEdge + ?Sized> DuctEdge for &T {
    fn edge_key(&self) -> &str {
        (**self).edge_key()
    }

    fn from_component(&self) -> Option<&str> {
        (**self).from_component()
    }

    fn to_component(&self) -> Option<&str> {
        (**self).to_component()
    }

    fn order_hint(&self) -> i64 {
        (**self).order_hint()
    }
}

/// Minimal owned segment reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRef {
    pub key: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub order_hint: i64,
}

impl SegmentRef {
    pub fn new(key: &str, from: Option<&str>, to: Option<&str>, order_hint: i64) -> Self {
        Self {
            key: key.to_string(),
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            order_hint,
        }
    }
}

impl DuctEdge for SegmentRef {
    fn edge_key(&self) -> &str {
        &self.key
    }

    fn from_component(&self) -> Option<&str> {
        self.from.as_deref()
    }

    fn to_component(&self) -> Option<&str> {
        self.to.as_deref()
    }

    fn order_hint(&self) -> i64 {
        self.order_hint
    }
}

/// A segment inside the graph. The edge id's index is the position of the
/// segment in the caller's input slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub key: String,
    pub from: Option<NodeId>,
    pub to: Option<NodeId>,
    pub order_hint: i64,
}

/// Interned segment graph: component names become compact node ids, segments
/// become edges in input order.
#[derive(Debug, Clone)]
pub struct SegmentGraph {
    pub(crate) nodes: Vec<String>,
    pub(crate) node_index: HashMap<String, NodeId>,
    pub(crate) edges: Vec<Edge>,
}

impl SegmentGraph {
    /// All component names, indexed by node id.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// All edges in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot())
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.slot()).map(String::as_str)
    }

    /// Component → first segment leaving it. Later segments sharing the same
    /// upstream component (tees, wyes) are not represented.
    pub fn first_outgoing(&self) -> HashMap<NodeId, EdgeId> {
        let mut map = HashMap::new();
        for edge in &self.edges {
            if let Some(from) = edge.from {
                map.entry(from).or_insert(edge.id);
            }
        }
        map
    }

    /// Number of segments leaving each component.
    pub fn out_degree(&self) -> HashMap<NodeId, usize> {
        let mut degree = HashMap::new();
        for edge in &self.edges {
            if let Some(from) = edge.from {
                *degree.entry(from).or_insert(0) += 1;
            }
        }
        degree
    }

    /// Whether any segment ends at this component.
    pub fn has_incoming(&self, node: NodeId) -> bool {
        self.edges.iter().any(|e| e.to == Some(node))
    }
}
