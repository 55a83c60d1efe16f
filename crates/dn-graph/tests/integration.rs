//! Integration tests for dn-graph.

use dn_graph::{Connectivity, DuctEdge, SegmentGraphBuilder, order, try_order};

/// A caller-side segment record, the way a project snapshot would hold it.
struct Duct {
    id: String,
    from: Option<String>,
    to: Option<String>,
    stored_order: i64,
    length_ft: f64,
}

impl Duct {
    fn new(id: &str, from: &str, to: &str, stored_order: i64, length_ft: f64) -> Self {
        Self {
            id: id.into(),
            from: Some(from.into()),
            to: Some(to.into()),
            stored_order,
            length_ft,
        }
    }
}

impl DuctEdge for Duct {
    fn edge_key(&self) -> &str {
        &self.id
    }
    fn from_component(&self) -> Option<&str> {
        self.from.as_deref()
    }
    fn to_component(&self) -> Option<&str> {
        self.to.as_deref()
    }
    fn order_hint(&self) -> i64 {
        self.stored_order
    }
}

#[test]
fn scenario_topology_wins_over_stored_order() {
    let segments = vec![Duct::new("A→B", "A", "B", 2, 10.0), Duct::new("B→C", "B", "C", 1, 5.0)];
    let ordered = order(&segments, None);
    let ids: Vec<&str> = ordered.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["A→B", "B→C"]);
}

#[test]
fn supply_run_from_ahu_to_diffuser() {
    // Stored in reverse, with misleading hints.
    let segments = vec![
        Duct::new("s4", "VAV-3", "D-12", 1, 6.0),
        Duct::new("s3", "EL-2", "VAV-3", 2, 12.0),
        Duct::new("s2", "TEE-1", "EL-2", 3, 20.0),
        Duct::new("s1", "AHU-1", "TEE-1", 4, 35.0),
    ];
    let (ordered, resolution) = try_order(&segments, Some("AHU-1")).unwrap();
    let ids: Vec<&str> = ordered.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3", "s4"]);
    assert_eq!(resolution.walked, 4);
    assert!(!resolution.cycle_detected);

    let total: f64 = ordered.iter().map(|d| d.length_ft).sum();
    assert_eq!(total, 73.0);
}

#[test]
fn branch_is_reported_through_the_graph() {
    let segments = vec![
        Duct::new("main", "AHU-1", "TEE-1", 1, 30.0),
        Duct::new("left", "TEE-1", "D-1", 2, 10.0),
        Duct::new("right", "TEE-1", "D-2", 3, 10.0),
    ];
    let graph = SegmentGraphBuilder::from_edges(&segments).unwrap();
    let resolution = graph.resolve(None).unwrap();
    let branch_names: Vec<&str> = resolution
        .branch_nodes
        .iter()
        .filter_map(|&n| graph.node_name(n))
        .collect();
    assert_eq!(branch_names, vec!["TEE-1"]);

    let connectivity = Connectivity::analyze(&segments);
    assert_eq!(connectivity.sources, vec!["AHU-1"]);
    assert_eq!(connectivity.sinks.len(), 2);
}
