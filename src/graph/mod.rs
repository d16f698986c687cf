//! In-memory graph engine: adjacency, enumeration and page assembly.
//!
//! ```text
//! AdjacencyMap → roots + ChildIndex → PathEnumerator → assemble → inject_self_reference
//! ```
//!
//! Everything here is synchronous and owns its data; I/O stays behind
//! [`GraphStore`](crate::store::GraphStore).

pub mod adjacency;
pub mod enumerator;
pub mod pagination;

pub use adjacency::{AdjacencyBuilder, AdjacencyMap, ChildIndex};
pub use enumerator::{Enumeration, PageScope, PathEnumerator};
pub use pagination::{assemble, inject_self_reference};

use crate::types::{OccurrenceId, PathPage};

/// Compute one page of root → `target` paths over an adjacency snapshot.
pub fn paginate(
    graph: &AdjacencyMap,
    target: OccurrenceId,
    scope: &PageScope,
    limit: usize,
) -> PathPage<OccurrenceId> {
    let enumerator = PathEnumerator::new(graph);
    let enumeration = enumerator.enumerate(target, scope, limit);

    let mut page = assemble(enumeration.paths, scope, limit, target);
    inject_self_reference(&mut page, scope, target, enumerator.is_root(target));
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GraphEdge, PathCursor};

    fn raw(page: &PathPage<OccurrenceId>) -> Vec<Vec<i64>> {
        page.paths
            .iter()
            .map(|p| p.nodes.iter().map(OccurrenceId::get).collect())
            .collect()
    }

    #[test]
    fn test_paginate_walks_forward_and_back() {
        // 1 -> {2, 3, 4} -> 9
        let graph = AdjacencyMap::from_edges(
            [(1, 2), (1, 3), (1, 4), (2, 9), (3, 9), (4, 9)].into_iter().map(GraphEdge::from),
        );
        let target = OccurrenceId::new(9);

        let first = paginate(&graph, target, &PageScope::Unscoped, 2);
        assert_eq!(raw(&first), vec![vec![1, 2, 9], vec![1, 3, 9]]);
        assert!(first.has_next_page);

        let second = paginate(&graph, target, &PageScope::After(first.end_cursor().unwrap()), 2);
        assert_eq!(raw(&second), vec![vec![1, 4, 9]]);
        assert!(second.has_previous_page);
        assert!(!second.has_next_page);

        let back = paginate(&graph, target, &PageScope::Before(second.start_cursor().unwrap()), 2);
        assert_eq!(raw(&back), vec![vec![1, 2, 9], vec![1, 3, 9]]);
        assert!(!back.has_previous_page);
        assert!(back.has_next_page);
    }

    #[test]
    fn test_paginate_orphan_target() {
        let graph = AdjacencyMap::from_edges([GraphEdge::from((1, 2))]);
        let page = paginate(&graph, OccurrenceId::new(9), &PageScope::Unscoped, 20);

        assert_eq!(raw(&page), vec![vec![9]]);
        assert!(!page.has_previous_page && !page.has_next_page);
    }

    #[test]
    fn test_paginate_root_target_with_zero_limit_still_reports_itself() {
        let graph = AdjacencyMap::from_edges([GraphEdge::from((1, 2))]);
        let page = paginate(&graph, OccurrenceId::new(1), &PageScope::Unscoped, 0);

        assert_eq!(raw(&page), vec![vec![1]]);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_paginate_scoped_orphan_is_empty() {
        let graph = AdjacencyMap::new();
        let cursor = PathCursor::from(&[9][..]);

        let after = paginate(&graph, OccurrenceId::new(9), &PageScope::After(cursor.clone()), 20);
        assert!(after.is_empty());

        let before = paginate(&graph, OccurrenceId::new(9), &PageScope::Before(cursor), 20);
        assert!(before.is_empty());
        assert!(before.has_next_page);
    }
}
