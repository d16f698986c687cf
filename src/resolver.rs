//! Dependency path resolver.
//!
//! Resolves one page of root → target paths for a project:
//!
//! ```text
//! latest_snapshot → AdjacencyBuilder → paginate → metrics → materialize
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ResolverConfig;
use crate::graph::{paginate, AdjacencyBuilder, AdjacencyMap, PageScope};
use crate::metrics::{NoOpMetrics, PathMetrics};
use crate::store::GraphStore;
use crate::types::{Occurrence, OccurrenceId, PathCursor, PathPage, ProjectId};

/// Error type for resolver operations.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// Both an `after` and a `before` cursor were supplied.
    #[error("Only one of `after` and `before` may be given")]
    ConflictingCursors,
    /// Store error.
    #[error("Store error: {0}")]
    Store(String),
    /// An id on the page could not be materialized (internal consistency violation).
    #[error("Occurrence {0} missing from materialized records")]
    MissingOccurrence(OccurrenceId),
}

impl ResolverError {
    /// Create a store error from any error type.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        Self::Store(e.to_string())
    }
}

/// Arguments for one page of dependency paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    /// Project owning the dependency graph.
    pub project: ProjectId,
    /// Occurrence the paths lead to.
    pub target: OccurrenceId,
    /// Return paths strictly after this one.
    pub after: Option<PathCursor>,
    /// Return paths strictly before this one.
    pub before: Option<PathCursor>,
    /// Page size. Falls back to [`ResolverConfig::default_limit`].
    pub limit: Option<usize>,
}

impl PathQuery {
    /// First page of paths to `target`.
    pub fn new(project: ProjectId, target: OccurrenceId) -> Self {
        Self {
            project,
            target,
            after: None,
            before: None,
            limit: None,
        }
    }

    /// Page forward from `cursor`.
    pub fn after(mut self, cursor: PathCursor) -> Self {
        self.after = Some(cursor);
        self
    }

    /// Page backward from `cursor`.
    pub fn before(mut self, cursor: PathCursor) -> Self {
        self.before = Some(cursor);
        self
    }

    /// Set the page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Resolves paginated dependency paths against a [`GraphStore`].
///
/// Each call reads the project's latest graph snapshot, builds its own
/// adjacency map and drops it on return. Calls share nothing mutable, so one
/// resolver can serve concurrent requests.
pub struct DependencyPathResolver<S: GraphStore> {
    store: Arc<S>,
    config: ResolverConfig,
    metrics: Arc<dyn PathMetrics>,
}

impl<S: GraphStore> DependencyPathResolver<S> {
    /// Create a resolver with default configuration and no metrics.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    /// Create a resolver with explicit configuration.
    pub fn with_config(store: Arc<S>, config: ResolverConfig) -> Self {
        Self {
            store,
            config,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Report page statistics to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn PathMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Resolve one page of paths.
    ///
    /// Storage failures propagate unchanged (no retries). An id that the
    /// store cannot materialize fails the whole call.
    pub async fn resolve_paths(&self, query: PathQuery) -> Result<PathPage<Occurrence>, ResolverError> {
        let started = Instant::now();
        let scope = PageScope::from_cursors(query.after, query.before)
            .ok_or(ResolverError::ConflictingCursors)?;
        let limit = query.limit.unwrap_or(self.config.default_limit);

        let graph = self.load_graph(query.project).await?;
        let page = paginate(&graph, query.target, &scope, limit);
        drop(graph);

        let (cyclic, non_cyclic) = page.cycle_counts();
        if let Err(e) = self.metrics.record_path_counts(cyclic, non_cyclic) {
            tracing::warn!(error = %e, "Failed to record dependency path metrics");
        }

        let fingerprint = page.fingerprint();
        let page = self.materialize(page).await?;

        tracing::info!(
            project = %query.project,
            target_id = %query.target,
            scope = scope.name(),
            limit,
            paths = page.len(),
            has_previous_page = page.has_previous_page,
            has_next_page = page.has_next_page,
            fingerprint = %fingerprint,
            latency_ms = started.elapsed().as_millis() as u64,
            "Dependency paths resolved"
        );

        Ok(page)
    }

    /// Build the adjacency map of the project's latest snapshot.
    async fn load_graph(&self, project: ProjectId) -> Result<AdjacencyMap, ResolverError> {
        let snapshot = self.store
            .latest_snapshot(project)
            .await
            .map_err(ResolverError::from_store)?;

        let Some(snapshot) = snapshot else {
            tracing::debug!(project = %project, "No dependency graph recorded");
            return Ok(AdjacencyMap::new());
        };

        AdjacencyBuilder::new(self.store.as_ref(), self.config.edge_batch_size)
            .build(project, snapshot)
            .await
            .map_err(ResolverError::from_store)
    }

    /// Replace every id on the page with its occurrence record.
    async fn materialize(&self, page: PathPage<OccurrenceId>) -> Result<PathPage<Occurrence>, ResolverError> {
        let ids: Vec<OccurrenceId> = page
            .paths
            .iter()
            .flat_map(|path| path.nodes.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut records: BTreeMap<OccurrenceId, Occurrence> = BTreeMap::new();
        for chunk in ids.chunks(self.config.node_batch_size.max(1)) {
            let resolved = self.store
                .resolve_occurrences(chunk)
                .await
                .map_err(ResolverError::from_store)?;
            records.extend(resolved.into_iter().map(|occurrence| (occurrence.id, occurrence)));
        }

        page.try_map_nodes(|id| {
            records
                .get(&id)
                .cloned()
                .ok_or(ResolverError::MissingOccurrence(id))
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TestMetrics;
    use crate::store::InMemoryGraphStore;
    use chrono::{TimeZone, Utc};

    fn project() -> ProjectId {
        ProjectId::new(7)
    }

    fn id(raw: i64) -> OccurrenceId {
        OccurrenceId::new(raw)
    }

    fn build_store(edges: &[(i64, i64)], occurrences: impl IntoIterator<Item = i64>) -> Arc<InMemoryGraphStore> {
        let mut store = InMemoryGraphStore::new();
        let snapshot = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        store.add_edges(project(), snapshot, edges.iter().copied());
        for raw in occurrences {
            store.add_occurrence(Occurrence::new(id(raw), format!("component-{}", raw)));
        }
        Arc::new(store)
    }

    fn names(page: &PathPage<Occurrence>) -> Vec<Vec<String>> {
        page.paths
            .iter()
            .map(|p| p.nodes.iter().map(|o| o.name.clone()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_materializes_in_path_order() {
        let store = build_store(&[(1, 2), (2, 3)], 1..=3);
        let resolver = DependencyPathResolver::new(store);

        let page = resolver.resolve_paths(PathQuery::new(project(), id(3))).await.unwrap();

        assert_eq!(names(&page), vec![vec!["component-1", "component-2", "component-3"]]);
    }

    #[tokio::test]
    async fn test_materializes_in_small_batches() {
        let store = build_store(&[(1, 2), (2, 3), (3, 4), (4, 5)], 1..=5);
        let config = ResolverConfig::default().with_node_batch_size(2).with_edge_batch_size(1);
        let resolver = DependencyPathResolver::with_config(store, config);

        let page = resolver.resolve_paths(PathQuery::new(project(), id(5))).await.unwrap();

        assert_eq!(page.paths[0].ids(), vec![id(1), id(2), id(3), id(4), id(5)]);
    }

    #[tokio::test]
    async fn test_missing_occurrence_is_fatal() {
        // Occurrence 2 has no record.
        let store = build_store(&[(1, 2), (2, 3)], [1, 3]);
        let resolver = DependencyPathResolver::new(store);

        let result = resolver.resolve_paths(PathQuery::new(project(), id(3))).await;

        assert!(matches!(result, Err(ResolverError::MissingOccurrence(missing)) if missing == id(2)));
    }

    #[tokio::test]
    async fn test_conflicting_cursors_rejected() {
        let store = build_store(&[(1, 2)], 1..=2);
        let resolver = DependencyPathResolver::new(store);

        let query = PathQuery::new(project(), id(2))
            .after(PathCursor::from(&[1, 2][..]))
            .before(PathCursor::from(&[1, 2][..]));

        assert!(matches!(
            resolver.resolve_paths(query).await,
            Err(ResolverError::ConflictingCursors)
        ));
    }

    #[tokio::test]
    async fn test_default_limit_comes_from_config() {
        // 1 -> {10..=14} -> 99: five paths
        let mut edges: Vec<(i64, i64)> = (10..=14).map(|mid| (1, mid)).collect();
        edges.extend((10..=14).map(|mid| (mid, 99)));
        let store = build_store(&edges, (1..=1).chain(10..=14).chain(99..=99));

        let config = ResolverConfig {
            default_limit: 3,
            ..ResolverConfig::default()
        };
        let resolver = DependencyPathResolver::with_config(store, config);

        let page = resolver.resolve_paths(PathQuery::new(project(), id(99))).await.unwrap();
        assert_eq!(page.len(), 3);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn test_metrics_receive_page_counts() {
        let store = build_store(&[(1, 2), (1, 3), (2, 4), (3, 4)], 1..=4);
        let metrics = Arc::new(TestMetrics::default());
        let resolver = DependencyPathResolver::new(store).with_metrics(metrics.clone());

        resolver.resolve_paths(PathQuery::new(project(), id(4))).await.unwrap();

        assert_eq!(metrics.paths_found(false), 2);
        assert_eq!(metrics.paths_found(true), 0);
    }
}
