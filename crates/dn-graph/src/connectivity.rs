//! Naive source/sink detection over raw component adjacency.
//!
//! This looks only at which components have segments leaving and entering
//! them. It cannot tell a real branch from a disconnection, so its output is
//! advisory.

use std::collections::{HashMap, HashSet};

use crate::graph::DuctEdge;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connectivity {
    /// Components with outgoing but no incoming segments.
    pub sources: Vec<String>,
    /// Components with incoming but no outgoing segments.
    pub sinks: Vec<String>,
    /// Components with more than one outgoing segment.
    pub branch_points: Vec<String>,
    /// Segments with neither endpoint connected.
    pub floating_segments: Vec<String>,
}

impl Connectivity {
    pub fn analyze<E: DuctEdge>(segments: &[E]) -> Self {
        let mut seen: Vec<&str> = Vec::new();
        let mut outgoing: HashMap<&str, usize> = HashMap::new();
        let mut incoming: HashSet<&str> = HashSet::new();
        let mut floating_segments = Vec::new();

        for seg in segments {
            let (from, to) = (seg.from_component(), seg.to_component());
            if from.is_none() && to.is_none() {
                floating_segments.push(seg.edge_key().to_string());
                continue;
            }
            if let Some(f) = from {
                if !outgoing.contains_key(f) && !incoming.contains(f) {
                    seen.push(f);
                }
                *outgoing.entry(f).or_insert(0) += 1;
            }
            if let Some(t) = to {
                if !outgoing.contains_key(t) && !incoming.contains(t) {
                    seen.push(t);
                }
                incoming.insert(t);
            }
        }

        let mut result = Connectivity {
            floating_segments,
            ..Default::default()
        };
        for name in seen {
            let outs = outgoing.get(name).copied().unwrap_or(0);
            let is_entered = incoming.contains(name);
            if outs > 0 && !is_entered {
                result.sources.push(name.to_string());
            }
            if outs == 0 && is_entered {
                result.sinks.push(name.to_string());
            }
            if outs > 1 {
                result.branch_points.push(name.to_string());
            }
        }
        result
    }
}
