//! Paths and pages of paths.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use super::cursor::PathCursor;
use super::occurrence::{OccurrenceId, OccurrenceKey};

/// A path from a root occurrence down to the target occurrence.
///
/// Generic over the node representation: ids during enumeration,
/// [`Occurrence`](super::Occurrence) records after materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyPath<T> {
    /// Nodes from root to target.
    pub nodes: Vec<T>,
    /// Whether the path revisits a node.
    pub is_cyclic: bool,
}

/// A path of raw occurrence ids.
pub type IdPath = DependencyPath<OccurrenceId>;

impl<T> DependencyPath<T> {
    /// Create a non-cyclic path.
    pub fn new(nodes: Vec<T>) -> Self {
        Self {
            nodes,
            is_cyclic: false,
        }
    }

    /// Number of nodes in the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rewrite every node, failing on the first node `f` rejects.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<DependencyPath<U>, E> {
        Ok(DependencyPath {
            nodes: self.nodes.into_iter().map(f).collect::<Result<_, _>>()?,
            is_cyclic: self.is_cyclic,
        })
    }
}

impl<T: OccurrenceKey> DependencyPath<T> {
    /// Occurrence ids along the path.
    pub fn ids(&self) -> Vec<OccurrenceId> {
        self.nodes.iter().map(OccurrenceKey::occurrence_id).collect()
    }

    /// Cursor pointing at this path.
    pub fn cursor(&self) -> PathCursor {
        PathCursor::new(self.ids())
    }

    /// Whether this is exactly the single-node path `[id]`.
    pub fn is_single(&self, id: OccurrenceId) -> bool {
        self.nodes.len() == 1 && self.nodes[0].occurrence_id() == id
    }
}

/// One page of dependency paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPage<T> {
    /// Paths on this page, in canonical order.
    pub paths: Vec<DependencyPath<T>>,
    /// Whether paths exist before the first one on this page.
    pub has_previous_page: bool,
    /// Whether paths exist after the last one on this page.
    pub has_next_page: bool,
}

impl<T> PathPage<T> {
    /// A page with no paths and no neighbours.
    pub fn empty() -> Self {
        Self {
            paths: Vec::new(),
            has_previous_page: false,
            has_next_page: false,
        }
    }

    /// Number of paths on the page.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the page holds no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Count of (cyclic, non-cyclic) paths on the page.
    pub fn cycle_counts(&self) -> (usize, usize) {
        let cyclic = self.paths.iter().filter(|p| p.is_cyclic).count();
        (cyclic, self.paths.len() - cyclic)
    }

    /// Rewrite every node of every path, keeping order and flags.
    pub fn try_map_nodes<U, E>(
        self,
        mut f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<PathPage<U>, E> {
        let paths = self
            .paths
            .into_iter()
            .map(|path| path.try_map(&mut f))
            .collect::<Result<_, _>>()?;

        Ok(PathPage {
            paths,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        })
    }
}

impl<T: OccurrenceKey> PathPage<T> {
    /// Cursor of the first path, for fetching the previous page.
    pub fn start_cursor(&self) -> Option<PathCursor> {
        self.paths.first().map(DependencyPath::cursor)
    }

    /// Cursor of the last path, for fetching the next page.
    pub fn end_cursor(&self) -> Option<PathCursor> {
        self.paths.last().map(DependencyPath::cursor)
    }
}

impl<T: Serialize> PathPage<T> {
    /// Deterministic fingerprint of the page contents (xxh64, hex).
    ///
    /// Identical graph snapshot and query arguments yield identical fingerprints.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}
