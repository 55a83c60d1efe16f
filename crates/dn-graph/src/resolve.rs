//! Source→terminal ordering of a path's segments.
//!
//! Stored order hints are not trusted: the order is re-derived from the
//! segment topology every time. Only one outgoing segment per component is
//! followed, so tees and wyes collapse to a single linear path. Whatever the
//! walk does not reach is appended in stored order, which keeps the output a
//! permutation of the input.

use std::collections::HashSet;

use dn_core::{EdgeId, NodeId};
use tracing::{debug, warn};

use crate::builder::SegmentGraphBuilder;
use crate::error::{GraphError, GraphResult};
use crate::graph::{DuctEdge, SegmentGraph};

/// Outcome of a topology walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Every edge exactly once: the walked chain first, then the orphans.
    pub order: Vec<EdgeId>,
    /// Component the walk started from.
    pub start: Option<NodeId>,
    /// Number of edges reached by following the chain.
    pub walked: usize,
    /// The walk stopped on a segment it had already visited.
    pub cycle_detected: bool,
    /// Components with more than one outgoing segment. Only the first one
    /// was followed.
    pub branch_nodes: Vec<NodeId>,
    /// Edges the walk never reached, in stored order.
    pub orphans: Vec<EdgeId>,
}

impl SegmentGraph {
    /// Walk the graph from its source and return the resolved edge order.
    pub fn resolve(&self, preferred_source: Option<&str>) -> GraphResult<Resolution> {
        let outgoing = self.first_outgoing();
        let degree = self.out_degree();

        let start = self.pick_start(preferred_source, &outgoing);

        let cap = self.edges.len() + 2;
        let mut visited: HashSet<EdgeId> = HashSet::new();
        let mut chain = Vec::with_capacity(self.edges.len());
        let mut cycle_detected = false;
        let mut current = start;
        let mut steps = 0;

        while let Some(node) = current {
            if steps >= cap {
                break;
            }
            steps += 1;

            let Some(&edge_id) = outgoing.get(&node) else {
                break;
            };
            if !visited.insert(edge_id) {
                cycle_detected = true;
                break;
            }
            chain.push(edge_id);

            let edge = self
                .edge(edge_id)
                .ok_or(GraphError::IdNotFound { what: "EdgeId" })?;
            current = edge.to;
        }

        let walked = chain.len();
        let mut orphans: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| !visited.contains(&e.id))
            .map(|e| e.id)
            .collect();
        // Stable: ties keep input order.
        orphans.sort_by_key(|id| self.edges[id.slot()].order_hint);

        let mut order = chain;
        order.extend(orphans.iter().copied());

        if order.len() != self.edges.len() {
            return Err(GraphError::NotPermutation {
                expected: self.edges.len(),
                found: order.len(),
            });
        }

        let mut branch_nodes: Vec<NodeId> = degree
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(node, _)| node)
            .collect();
        branch_nodes.sort();

        Ok(Resolution {
            order,
            start,
            walked,
            cycle_detected,
            branch_nodes,
            orphans,
        })
    }

    fn pick_start(
        &self,
        preferred_source: Option<&str>,
        outgoing: &std::collections::HashMap<NodeId, EdgeId>,
    ) -> Option<NodeId> {
        if let Some(node) = preferred_source.and_then(|name| self.node_id(name))
            && outgoing.contains_key(&node)
        {
            return Some(node);
        }

        // A true source: leaves somewhere, never entered. First one wins.
        let destinations: HashSet<NodeId> = self.edges.iter().filter_map(|e| e.to).collect();
        if let Some(node) = self
            .edges
            .iter()
            .filter_map(|e| e.from)
            .find(|from| !destinations.contains(from))
        {
            return Some(node);
        }

        // Everything is entered somewhere (a loop): start from the upstream end
        // of the lowest stored segment.
        self.edges
            .iter()
            .filter(|e| e.from.is_some())
            .min_by_key(|e| e.order_hint)
            .and_then(|e| e.from)
    }
}

/// Segments sorted by their stored order hint (stable).
pub fn by_order_hint<E: DuctEdge>(segments: &[E]) -> Vec<&E> {
    let mut sorted: Vec<&E> = segments.iter().collect();
    sorted.sort_by_key(|s| s.order_hint());
    sorted
}

/// Order segments from source to terminal, returning the resolution details.
pub fn try_order<'a, E: DuctEdge>(
    segments: &'a [E],
    preferred_source: Option<&str>,
) -> GraphResult<(Vec<&'a E>, Resolution)> {
    let graph = SegmentGraphBuilder::from_edges(segments)?;
    let resolution = graph.resolve(preferred_source)?;
    let ordered = resolution
        .order
        .iter()
        .map(|id| {
            segments
                .get(id.slot())
                .ok_or(GraphError::IdNotFound { what: "EdgeId" })
        })
        .collect::<GraphResult<Vec<_>>>()?;
    Ok((ordered, resolution))
}

/// Order segments from source to terminal.
///
/// Never fails: if the topology cannot be resolved the segments come back
/// sorted by their stored order hint.
pub fn order<'a, E: DuctEdge>(segments: &'a [E], preferred_source: Option<&str>) -> Vec<&'a E> {
    match try_order(segments, preferred_source) {
        Ok((ordered, resolution)) => {
            debug!(
                segments = segments.len(),
                walked = resolution.walked,
                orphans = resolution.orphans.len(),
                cycle = resolution.cycle_detected,
                "resolved segment order"
            );
            ordered
        }
        Err(err) => {
            warn!(error = %err, "segment order resolution failed, using stored order");
            by_order_hint(segments)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::graph::SegmentRef;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn simple_chain_orders_source_to_terminal(
            (len, perm, hints) in (1usize..12).prop_flat_map(|len| (
                Just(len),
                Just((0..len).collect::<Vec<_>>()).prop_shuffle(),
                prop::collection::vec(-50i64..50, len),
            ))
        ) {
            let chain: Vec<SegmentRef> = (0..len)
                .map(|i| {
                    let from = format!("n{i}");
                    let to = format!("n{}", i + 1);
                    SegmentRef::new(&format!("s{i}"), Some(&from), Some(&to), hints[i])
                })
                .collect();
            let shuffled: Vec<SegmentRef> = perm.iter().map(|&i| chain[i].clone()).collect();

            let ordered = order(&shuffled, None);
            let got: Vec<&str> = ordered.iter().map(|s| s.key.as_str()).collect();
            let expected: Vec<String> = (0..len).map(|i| format!("s{i}")).collect();
            prop_assert_eq!(got, expected.iter().map(String::as_str).collect::<Vec<_>>());
        }

        #[test]
        fn output_is_always_a_permutation(
            edges in prop::collection::vec((0u8..5, 0u8..5, -5i64..5), 0..10)
        ) {
            let segments: Vec<SegmentRef> = edges
                .iter()
                .enumerate()
                .map(|(i, (f, t, h))| {
                    SegmentRef::new(
                        &format!("s{i}"),
                        Some(&format!("n{f}")),
                        Some(&format!("n{t}")),
                        *h,
                    )
                })
                .collect();
            let ordered = order(&segments, None);
            let mut got: Vec<&str> = ordered.iter().map(|s| s.key.as_str()).collect();
            got.sort();
            let mut expected: Vec<&str> = segments.iter().map(|s| s.key.as_str()).collect();
            expected.sort();
            prop_assert_eq!(got, expected);
        }
    }
}
