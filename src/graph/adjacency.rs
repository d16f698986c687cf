//! Adjacency map construction and root resolution.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::store::GraphStore;
use crate::types::{GraphEdge, OccurrenceId, ProjectId};

/// In-memory `descendant -> {ancestor}` map for one graph snapshot.
///
/// Built once per resolution and dropped afterwards. Memory grows with the
/// snapshot; there is no bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyMap {
    ancestors: BTreeMap<OccurrenceId, BTreeSet<OccurrenceId>>,
    edge_count: usize,
}

impl AdjacencyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from edges in any order.
    pub fn from_edges(edges: impl IntoIterator<Item = GraphEdge>) -> Self {
        let mut map = Self::new();
        for edge in edges {
            map.insert(edge);
        }
        map
    }

    /// Record an edge. Duplicate edges are ignored.
    pub fn insert(&mut self, edge: GraphEdge) {
        if self.ancestors
            .entry(edge.descendant)
            .or_default()
            .insert(edge.ancestor)
        {
            self.edge_count += 1;
        }
    }

    /// Ancestors recorded for `id`, ascending.
    pub fn ancestors_of(&self, id: OccurrenceId) -> impl Iterator<Item = OccurrenceId> + '_ {
        self.ancestors.get(&id).into_iter().flatten().copied()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether no edges were recorded.
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Every id appearing as a descendant or an ancestor.
    pub fn node_ids(&self) -> BTreeSet<OccurrenceId> {
        self.ancestors
            .iter()
            .flat_map(|(descendant, ancestors)| {
                std::iter::once(*descendant).chain(ancestors.iter().copied())
            })
            .collect()
    }

    /// Whether `id` appears in the graph without any recorded ancestor.
    pub fn is_root(&self, id: OccurrenceId) -> bool {
        match self.ancestors.get(&id) {
            Some(ancestors) => ancestors.is_empty(),
            None => self.ancestors.values().any(|a| a.contains(&id)),
        }
    }

    /// Graph entry points, sorted ascending.
    ///
    /// This order fixes the canonical order of every enumerated path.
    pub fn roots(&self) -> Vec<OccurrenceId> {
        self.node_ids()
            .into_iter()
            .filter(|id| self.ancestors.get(id).map_or(true, BTreeSet::is_empty))
            .collect()
    }

    /// Inverted `ancestor -> [descendant]` index, children sorted ascending.
    pub fn child_index(&self) -> ChildIndex {
        let mut children: BTreeMap<OccurrenceId, Vec<OccurrenceId>> = BTreeMap::new();

        // Keys iterate ascending, so each child list comes out sorted.
        for (descendant, ancestors) in &self.ancestors {
            for ancestor in ancestors {
                children.entry(*ancestor).or_default().push(*descendant);
            }
        }

        ChildIndex { children }
    }
}

/// Children of each node, sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct ChildIndex {
    children: BTreeMap<OccurrenceId, Vec<OccurrenceId>>,
}

impl ChildIndex {
    /// Children of `id`, ascending. Empty for leaves and unknown ids.
    pub fn children_of(&self, id: OccurrenceId) -> &[OccurrenceId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Loads a project snapshot from a [`GraphStore`] in fixed-size batches.
pub struct AdjacencyBuilder<'s, S: GraphStore> {
    store: &'s S,
    batch_size: usize,
}

impl<'s, S: GraphStore> AdjacencyBuilder<'s, S> {
    /// Create a builder reading `batch_size` edges per request.
    pub fn new(store: &'s S, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Read every edge of the snapshot into an [`AdjacencyMap`].
    ///
    /// Each request resumes strictly after the last edge of the previous
    /// batch. A short batch ends the scan.
    pub async fn build(
        &self,
        project: ProjectId,
        snapshot: DateTime<Utc>,
    ) -> Result<AdjacencyMap, S::Error> {
        let mut map = AdjacencyMap::new();
        let mut after: Option<GraphEdge> = None;
        let mut batches = 0usize;

        loop {
            let batch = self.store
                .fetch_edge_batch(project, snapshot, after, self.batch_size)
                .await?;
            batches += 1;

            let exhausted = batch.len() < self.batch_size;
            after = batch.last().copied();
            for edge in batch {
                map.insert(edge);
            }

            if exhausted || after.is_none() {
                break;
            }
        }

        tracing::debug!(
            project = %project,
            snapshot = %snapshot,
            batches,
            edges = map.edge_count(),
            "Adjacency map built"
        );

        Ok(map)
    }
}
