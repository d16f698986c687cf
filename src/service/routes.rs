//! Axum routes for the dependency paths service.

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::resolver::{PathQuery, ResolverError};
use crate::store::{GraphStore, PostgresGraphStore};
use crate::types::{DependencyPath, Occurrence, OccurrenceId, PathCursor, ProjectId};
use crate::DEPENDENCY_PATHS_SCHEMA_VERSION;

use super::middleware::record_resolution_metrics;
use super::state::{ServiceState, ServiceStore};

/// Type alias for the service state with PostgresGraphStore.
pub type AppState = ServiceState<PostgresGraphStore>;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request for one page of dependency paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyPathsRequest {
    /// Project owning the dependency graph.
    pub project_id: i64,
    /// Occurrence the paths lead to.
    pub occurrence_id: i64,
    /// Opaque cursor: return paths after this one.
    #[serde(default)]
    pub after: Option<String>,
    /// Opaque cursor: return paths before this one.
    #[serde(default)]
    pub before: Option<String>,
    /// Page size, clamped to the service maximum.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Relay-style page information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether paths exist before `start_cursor`.
    pub has_previous_page: bool,
    /// Whether paths exist after `end_cursor`.
    pub has_next_page: bool,
    /// Cursor of the first path on the page.
    pub start_cursor: Option<String>,
    /// Cursor of the last path on the page.
    pub end_cursor: Option<String>,
}

/// One page of dependency paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyPathsResponse {
    /// Paths from a root occurrence down to the requested one.
    pub paths: Vec<DependencyPath<Occurrence>>,
    /// Cursors and neighbour flags.
    pub page_info: PageInfo,
    /// Deterministic fingerprint of the page.
    pub fingerprint: String,
    /// Wire format version.
    pub schema_version: String,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub schema_version: String,
    pub backend: String,
    /// Connection pool status, for pooled backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseHealth>,
}

/// Database health information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub pool_size: u32,
    pub pool_idle: usize,
    pub pool_max: u32,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness response with dependency status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
    pub details: Option<String>,
}

/// Structured error response with correlation ID for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Correlation ID for request tracing (matches X-Cloud-Trace-Context when present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            correlation_id: None,
            details: None,
        }
    }

    /// Add a correlation ID to the error.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Trace id from `X-Cloud-Trace-Context`, without the span suffix.
fn correlation_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Cloud-Trace-Context")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split('/').next())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn api_error(status: StatusCode, error: ErrorResponse, correlation: Option<&str>) -> ApiError {
    let error = match correlation {
        Some(id) => error.with_correlation_id(id),
        None => error,
    };
    tracing::warn!(
        status = status.as_u16(),
        code = %error.code,
        error = %error.error,
        correlation_id = ?error.correlation_id,
        "Request error"
    );
    (status, Json(error))
}

/// Decode an optional opaque cursor. Blank strings count as absent.
fn decode_cursor(
    raw: Option<&str>,
    argument: &str,
    correlation: Option<&str>,
) -> Result<Option<PathCursor>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    PathCursor::decode(raw).map(Some).map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_CURSOR", format!("Invalid `{}` cursor: {}", argument, e))
                .with_details(raw.to_string()),
            correlation,
        )
    })
}

fn resolver_error(e: ResolverError, correlation: Option<&str>) -> ApiError {
    let (status, code) = match &e {
        ResolverError::ConflictingCursors => (StatusCode::BAD_REQUEST, "CONFLICTING_CURSORS"),
        ResolverError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RESOLUTION_FAILED"),
        ResolverError::MissingOccurrence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INCONSISTENT_GRAPH"),
    };
    api_error(status, ErrorResponse::new(code, e.to_string()), correlation)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Resolve one page of dependency paths.
async fn dependency_paths_handler<S: ServiceStore>(
    State(state): State<Arc<ServiceState<S>>>,
    headers: HeaderMap,
    Json(request): Json<DependencyPathsRequest>,
) -> Result<Json<DependencyPathsResponse>, ApiError> {
    let started = Instant::now();
    let correlation = correlation_id(&headers);

    let after = decode_cursor(request.after.as_deref(), "after", correlation.as_deref())?;
    let before = decode_cursor(request.before.as_deref(), "before", correlation.as_deref())?;

    let mut query = PathQuery::new(
        ProjectId::new(request.project_id),
        OccurrenceId::new(request.occurrence_id),
    )
    .limit(state.page_limit(request.limit));
    query.after = after;
    query.before = before;

    let page = state
        .resolver
        .resolve_paths(query)
        .await
        .map_err(|e| resolver_error(e, correlation.as_deref()))?;

    record_resolution_metrics(page.len(), started.elapsed().as_millis() as u64);

    Ok(Json(DependencyPathsResponse {
        page_info: PageInfo {
            has_previous_page: page.has_previous_page,
            has_next_page: page.has_next_page,
            start_cursor: page.start_cursor().map(|c| c.encode()),
            end_cursor: page.end_cursor().map(|c| c.encode()),
        },
        fingerprint: page.fingerprint(),
        schema_version: DEPENDENCY_PATHS_SCHEMA_VERSION.to_string(),
        paths: page.paths,
    }))
}

/// Health check endpoint (detailed).
async fn health_handler<S: ServiceStore>(
    State(state): State<Arc<ServiceState<S>>>,
) -> Json<HealthResponse> {
    let healthy = state.store.is_healthy().await;
    let database = state.store.pool_stats().map(|stats| DatabaseHealth {
        connected: healthy,
        pool_size: stats.size,
        pool_idle: stats.idle,
        pool_max: stats.max,
    });

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: DEPENDENCY_PATHS_SCHEMA_VERSION.to_string(),
        backend: state.store.backend().to_string(),
        database,
    })
}

/// Liveness probe endpoint.
///
/// Does NOT check dependencies.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 if the store is reachable, 503 otherwise.
async fn readiness_handler<S: ServiceStore>(
    State(state): State<Arc<ServiceState<S>>>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    if state.store.is_healthy().await {
        Ok(Json(ReadinessResponse {
            ready: true,
            database: true,
            details: None,
        }))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                database: false,
                details: Some("Database connection failed".to_string()),
            }),
        ))
    }
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the dependency paths service.
pub fn create_router<S: ServiceStore>(state: ServiceState<S>) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/dependency_paths", post(dependency_paths_handler::<S>))
        // Health checks
        .route("/health", get(health_handler::<S>))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler::<S>))
        .with_state(state)
}
