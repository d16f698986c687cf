//! Resolver configuration.
//!
//! All settings can be configured via environment variables:
//! - `DEPENDENCY_PATHS_EDGE_BATCH_SIZE`: Edges fetched per storage read (default: 1000)
//! - `DEPENDENCY_PATHS_NODE_BATCH_SIZE`: Occurrences materialized per read (default: 100)
//! - `DEPENDENCY_PATHS_DEFAULT_LIMIT`: Page size when the caller gives none (default: 20)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default number of paths per page.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Default number of edges fetched per storage read.
pub const DEFAULT_EDGE_BATCH_SIZE: usize = 1000;

/// Default number of occurrences materialized per storage read.
pub const DEFAULT_NODE_BATCH_SIZE: usize = 100;

/// Read an environment variable, falling back to `default` when it is
/// missing or does not parse.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration for [`DependencyPathResolver`](crate::DependencyPathResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Edges fetched per storage read while building the adjacency map.
    pub edge_batch_size: usize,
    /// Occurrence ids resolved per storage read while materializing a page.
    pub node_batch_size: usize,
    /// Page size used when the query does not set one.
    pub default_limit: usize,
}

impl ResolverConfig {
    /// Load configuration from environment variables with production defaults.
    ///
    /// Batch sizes of zero are raised to one.
    pub fn from_env() -> Self {
        Self {
            edge_batch_size: env_or("DEPENDENCY_PATHS_EDGE_BATCH_SIZE", DEFAULT_EDGE_BATCH_SIZE).max(1),
            node_batch_size: env_or("DEPENDENCY_PATHS_NODE_BATCH_SIZE", DEFAULT_NODE_BATCH_SIZE).max(1),
            default_limit: env_or("DEPENDENCY_PATHS_DEFAULT_LIMIT", DEFAULT_PAGE_LIMIT),
        }
    }

    /// Set the edge batch size.
    pub fn with_edge_batch_size(mut self, size: usize) -> Self {
        self.edge_batch_size = size.max(1);
        self
    }

    /// Set the materialization batch size.
    pub fn with_node_batch_size(mut self, size: usize) -> Self {
        self.node_batch_size = size.max(1);
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            edge_batch_size: DEFAULT_EDGE_BATCH_SIZE,
            node_batch_size: DEFAULT_NODE_BATCH_SIZE,
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
