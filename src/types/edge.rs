//! Edge types for the dependency graph.

use serde::{Deserialize, Serialize};
use super::occurrence::OccurrenceId;

/// Edge in the dependency graph.
///
/// `ancestor` introduces (depends on) `descendant`.
/// Implements `Ord` for deterministic ordering: (ancestor, descendant).
/// Edge sources page through a snapshot in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Occurrence that introduces the dependency.
    pub ancestor: OccurrenceId,
    /// Occurrence being introduced.
    pub descendant: OccurrenceId,
}

impl GraphEdge {
    /// Create a new edge.
    pub fn new(ancestor: OccurrenceId, descendant: OccurrenceId) -> Self {
        Self {
            ancestor,
            descendant,
        }
    }

    /// Whether the edge points back at its own source.
    pub fn is_self_loop(&self) -> bool {
        self.ancestor == self.descendant
    }
}

impl From<(i64, i64)> for GraphEdge {
    fn from((ancestor, descendant): (i64, i64)) -> Self {
        Self::new(OccurrenceId::new(ancestor), OccurrenceId::new(descendant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_ordering() {
        let e1 = GraphEdge::from((1, 2));
        let e2 = GraphEdge::from((1, 3));
        let e3 = GraphEdge::from((2, 3));

        // Same ancestor, different descendant
        assert!(e1 < e2);
        // Different ancestor
        assert!(e1 < e3);
        assert!(e2 < e3);
    }

    #[test]
    fn test_self_loop() {
        assert!(GraphEdge::from((4, 4)).is_self_loop());
        assert!(!GraphEdge::from((4, 5)).is_self_loop());
    }
}
