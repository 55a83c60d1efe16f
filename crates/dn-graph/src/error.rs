//! Graph-specific error types.

use dn_core::{EdgeId, NodeId};

pub type GraphResult<T> = Result<T, GraphError>;

/// Segment graph construction and resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge endpoint refers to a node that was never interned.
    DanglingNode { edge: EdgeId, node: NodeId },

    /// Two segments share the same key.
    DuplicateEdge { key: String },

    /// The resolver produced something other than a permutation of its input.
    NotPermutation { expected: usize, found: usize },

    /// ID not found in the graph.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DanglingNode { edge, node } => {
                write!(f, "Edge {} refers to non-existent node {}", edge, node)
            }
            GraphError::DuplicateEdge { key } => {
                write!(f, "Segment '{}' appears more than once", key)
            }
            GraphError::NotPermutation { expected, found } => {
                write!(
                    f,
                    "Resolved order has {} segments but input had {}",
                    found, expected
                )
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found in segment graph", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_segment() {
        let err = GraphError::DuplicateEdge { key: "seg-7".into() };
        assert!(err.to_string().contains("seg-7"));
    }
}
