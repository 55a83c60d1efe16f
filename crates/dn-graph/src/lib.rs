//! dn-graph: duct segment graph for ductnoise.
//!
//! Provides:
//! - An interning builder that turns segment endpoints into compact node ids
//! - The source→terminal resolver that orders a path's segments
//! - Naive source/sink connectivity analysis over raw component adjacency
//!
//! # Example
//!
//! ```
//! use dn_graph::{order, SegmentRef};
//!
//! let segments = vec![
//!     SegmentRef::new("s2", Some("B"), Some("C"), 1),
//!     SegmentRef::new("s1", Some("A"), Some("B"), 2),
//! ];
//! let ordered = order(&segments, None);
//! assert_eq!(ordered[0].key, "s1");
//! assert_eq!(ordered[1].key, "s2");
//! ```

pub mod builder;
pub mod connectivity;
pub mod error;
pub mod graph;
pub mod resolve;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::SegmentGraphBuilder;
pub use connectivity::Connectivity;
pub use error::{GraphError, GraphResult};
pub use graph::{DuctEdge, Edge, SegmentGraph, SegmentRef};
pub use resolve::{Resolution, by_order_hint, order, try_order};
