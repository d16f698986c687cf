//! # dependency-paths
//!
//! Paginated dependency paths over SBOM occurrence graphs.
//!
//! The resolver answers one question:
//!
//! > Through which chains of dependencies does a project pull in this occurrence?
//!
//! ## Core Contract
//!
//! 1. Read the project's latest dependency graph snapshot as ancestor → descendant edges
//! 2. Enumerate every simple root → target path in lexicographic order
//! 3. Return one page of paths, addressable forward (`after`) or backward (`before`)
//!    by the id sequence of a neighbouring path
//!
//! ## Architecture
//!
//! ```text
//! PathQuery → DependencyPathResolver → AdjacencyBuilder → PathEnumerator → PathPage
//!                       ↓                                                     ↓
//!             GraphStore (Postgres or Memory)                         materialize
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same target + same cursor + same limit + same snapshot → identical page
//! - Paths never repeat a node
//! - Consecutive pages neither overlap nor skip paths

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod graph;
pub mod config;
pub mod metrics;
pub mod canonical;
pub mod resolver;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{
    CursorError, DependencyPath, GraphEdge, IdPath, Occurrence, OccurrenceId, OccurrenceKey,
    PathCursor, PathPage, ProjectId,
};
pub use graph::{paginate, AdjacencyBuilder, AdjacencyMap, PageScope, PathEnumerator};
pub use store::{GraphStore, InMemoryGraphStore};
#[cfg(feature = "postgres")]
pub use store::PostgresGraphStore;
pub use config::ResolverConfig;
pub use metrics::{PathMetrics, MetricsError, NoOpMetrics, TracingMetrics, TestMetrics};
pub use resolver::{DependencyPathResolver, PathQuery, ResolverError};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Version of the page wire format (cursor encoding and response shape).
pub const DEPENDENCY_PATHS_SCHEMA_VERSION: &str = "1.0.0";
