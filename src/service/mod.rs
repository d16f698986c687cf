//! Dependency Paths REST Service
//!
//! Exposes the resolver as a REST API.
//!
//! ## Endpoints
//!
//! - `POST /api/dependency_paths` - One page of dependency paths for an occurrence
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_resolution_metrics};
pub use routes::{create_router, AppState, DependencyPathsRequest, DependencyPathsResponse, PageInfo};
pub use state::{ServiceConfig, ServiceState, ServiceStore};
