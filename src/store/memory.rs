//! In-memory graph store for testing.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{GraphEdge, Occurrence, OccurrenceId, ProjectId};
use super::GraphStore;

/// Error type for in-memory store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryError {
    /// Batch size of zero can never make progress.
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(usize),
    /// Snapshot not recorded for the project.
    #[error("Snapshot {snapshot} not found for project {project}")]
    SnapshotNotFound {
        /// Project that was queried.
        project: ProjectId,
        /// Snapshot that was requested.
        snapshot: DateTime<Utc>,
    },
}

/// In-memory graph store for testing.
///
/// Uses BTreeMap/BTreeSet for deterministic iteration order. Each project
/// may hold several snapshots; only the one asked for is ever read.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    /// Project -> snapshot timestamp -> edges.
    snapshots: BTreeMap<ProjectId, BTreeMap<DateTime<Utc>, BTreeSet<GraphEdge>>>,
    /// Occurrence records by id.
    occurrences: BTreeMap<OccurrenceId, Occurrence>,
    /// Number of edge batches served.
    edge_batches: AtomicUsize,
}

impl InMemoryGraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge to a project snapshot.
    pub fn add_edge(&mut self, project: ProjectId, snapshot: DateTime<Utc>, edge: GraphEdge) {
        self.snapshots
            .entry(project)
            .or_default()
            .entry(snapshot)
            .or_default()
            .insert(edge);
    }

    /// Add every `(ancestor, descendant)` pair to a project snapshot.
    pub fn add_edges(
        &mut self,
        project: ProjectId,
        snapshot: DateTime<Utc>,
        edges: impl IntoIterator<Item = (i64, i64)>,
    ) {
        for pair in edges {
            self.add_edge(project, snapshot, GraphEdge::from(pair));
        }
    }

    /// Add an occurrence record.
    pub fn add_occurrence(&mut self, occurrence: Occurrence) {
        self.occurrences.insert(occurrence.id, occurrence);
    }

    /// Get number of edges in a snapshot.
    pub fn num_edges(&self, project: ProjectId, snapshot: DateTime<Utc>) -> usize {
        self.snapshots
            .get(&project)
            .and_then(|by_time| by_time.get(&snapshot))
            .map_or(0, BTreeSet::len)
    }

    /// Get number of occurrence records.
    pub fn num_occurrences(&self) -> usize {
        self.occurrences.len()
    }

    /// Number of edge batches served so far.
    pub fn edge_batches_served(&self) -> usize {
        self.edge_batches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    type Error = InMemoryError;

    async fn latest_snapshot(&self, project: ProjectId)
        -> Result<Option<DateTime<Utc>>, Self::Error>
    {
        Ok(self.snapshots
            .get(&project)
            .and_then(|by_time| by_time.keys().next_back().copied()))
    }

    async fn fetch_edge_batch(
        &self,
        project: ProjectId,
        snapshot: DateTime<Utc>,
        after: Option<GraphEdge>,
        batch_size: usize,
    ) -> Result<Vec<GraphEdge>, Self::Error> {
        if batch_size == 0 {
            return Err(InMemoryError::InvalidBatchSize(batch_size));
        }

        let edges = self.snapshots
            .get(&project)
            .and_then(|by_time| by_time.get(&snapshot))
            .ok_or(InMemoryError::SnapshotNotFound { project, snapshot })?;

        let lower = match after {
            Some(edge) => Bound::Excluded(edge),
            None => Bound::Unbounded,
        };

        self.edge_batches.fetch_add(1, Ordering::Relaxed);

        Ok(edges
            .range((lower, Bound::Unbounded))
            .take(batch_size)
            .copied()
            .collect())
    }

    async fn resolve_occurrences(&self, ids: &[OccurrenceId])
        -> Result<Vec<Occurrence>, Self::Error>
    {
        let id_set: BTreeSet<_> = ids.iter().copied().collect();

        Ok(id_set.iter()
            .filter_map(|id| self.occurrences.get(id).cloned())
            .collect())
    }
}
