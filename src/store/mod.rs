//! Graph storage backends.
//!
//! The resolver reads through a single [`GraphStore`] seam: snapshot
//! discovery, batched edge reads, and occurrence materialization.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{GraphEdge, Occurrence, OccurrenceId, ProjectId};

/// Trait for graph storage backends.
///
/// Implementations must guarantee deterministic ordering of results.
/// The engine never writes through this trait.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync;

    /// Latest snapshot timestamp for which graph edges exist for the project.
    ///
    /// `None` when the project has no recorded graph.
    async fn latest_snapshot(&self, project: ProjectId)
        -> Result<Option<DateTime<Utc>>, Self::Error>;

    /// Fetch one batch of edges from a snapshot.
    ///
    /// Edges are ordered by (ancestor, descendant). The batch starts strictly
    /// after `after` when given, and holds at most `batch_size` edges.
    async fn fetch_edge_batch(
        &self,
        project: ProjectId,
        snapshot: DateTime<Utc>,
        after: Option<GraphEdge>,
        batch_size: usize,
    ) -> Result<Vec<GraphEdge>, Self::Error>;

    /// Resolve occurrence ids to fully attributed records (ordered by id).
    ///
    /// Unknown ids are omitted from the result.
    async fn resolve_occurrences(&self, ids: &[OccurrenceId])
        -> Result<Vec<Occurrence>, Self::Error>;

    /// Check if the backend is reachable.
    async fn is_healthy(&self) -> bool {
        true
    }
}

pub use memory::InMemoryGraphStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresGraphStore;
