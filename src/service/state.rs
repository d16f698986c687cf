//! Service state management.
//!
//! Holds the resolver, the store it reads from, and the HTTP-facing limits.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::config::{env_or, ResolverConfig};
use crate::metrics::{PathMetrics, TracingMetrics};
use crate::resolver::DependencyPathResolver;
use crate::store::postgres::PoolStats;
use crate::store::{GraphStore, InMemoryGraphStore, PostgresGraphStore};

/// Largest page a client may request.
pub const DEFAULT_MAX_LIMIT: usize = 100;

/// HTTP-facing settings.
///
/// Environment variables:
/// - `HOST`: Bind address (default: 0.0.0.0)
/// - `PORT`: Service port (default: 8001)
/// - `DEPENDENCY_PATHS_MAX_LIMIT`: Upper bound applied to client page sizes (default: 100)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bind address.
    pub host: String,
    /// Service port.
    pub port: u16,
    /// Client page sizes are clamped to this value.
    pub max_limit: usize,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 8001),
            max_limit: env_or("DEPENDENCY_PATHS_MAX_LIMIT", DEFAULT_MAX_LIMIT).max(1),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

/// Storage backends the service can report on in health checks.
pub trait ServiceStore: GraphStore + 'static {
    /// Short backend name.
    fn backend(&self) -> &'static str;

    /// Connection pool statistics, for pooled backends.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}

impl ServiceStore for PostgresGraphStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(PostgresGraphStore::pool_stats(self))
    }
}

impl ServiceStore for InMemoryGraphStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Shared service state.
pub struct ServiceState<S: ServiceStore> {
    /// The graph store backing the resolver.
    pub store: Arc<S>,
    /// Resolver shared by all requests.
    pub resolver: Arc<DependencyPathResolver<S>>,
    /// HTTP-facing settings.
    pub config: ServiceConfig,
}

impl<S: ServiceStore> ServiceState<S> {
    /// Create service state that reports page metrics as tracing events.
    pub fn new(store: S, resolver_config: ResolverConfig, config: ServiceConfig) -> Self {
        Self::with_metrics(store, resolver_config, config, Arc::new(TracingMetrics))
    }

    /// Create service state with an explicit metrics backend.
    pub fn with_metrics(
        store: S,
        resolver_config: ResolverConfig,
        config: ServiceConfig,
        metrics: Arc<dyn PathMetrics>,
    ) -> Self {
        let store = Arc::new(store);
        let resolver = DependencyPathResolver::with_config(Arc::clone(&store), resolver_config)
            .with_metrics(metrics);

        Self {
            store,
            resolver: Arc::new(resolver),
            config,
        }
    }

    /// Create service state from environment variables.
    pub fn from_env(store: S) -> Self {
        Self::new(store, ResolverConfig::from_env(), ServiceConfig::from_env())
    }

    /// Clamp a client page size, falling back to the resolver default.
    pub fn page_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.resolver.config().default_limit)
            .min(self.config.max_limit)
    }
}

impl<S: ServiceStore> Clone for ServiceState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resolver: Arc::clone(&self.resolver),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(max_limit: usize) -> ServiceState<InMemoryGraphStore> {
        let config = ServiceConfig {
            max_limit,
            ..ServiceConfig::default()
        };
        ServiceState::new(InMemoryGraphStore::new(), ResolverConfig::default(), config)
    }

    #[test]
    fn test_page_limit_defaults_to_resolver_config() {
        assert_eq!(state(100).page_limit(None), 20);
    }

    #[test]
    fn test_page_limit_is_clamped() {
        let state = state(100);
        assert_eq!(state.page_limit(Some(5000)), 100);
        assert_eq!(state.page_limit(Some(7)), 7);
        assert_eq!(state.page_limit(Some(0)), 0);
    }

    #[test]
    fn test_default_clamps_below_resolver_default() {
        assert_eq!(state(10).page_limit(None), 10);
    }

    #[test]
    fn test_memory_backend_reports_no_pool() {
        let store = InMemoryGraphStore::new();
        assert_eq!(store.backend(), "memory");
        assert!(ServiceStore::pool_stats(&store).is_none());
    }
}
