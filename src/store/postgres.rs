//! PostgreSQL graph store for production use.
//!
//! Reads the SBOM dependency graph tables:
//! - `sbom_graph_paths (project_id, ancestor_id, descendant_id, created_at)`
//! - `sbom_occurrences` joined with `sbom_components` and `sbom_component_versions`
//!
//! ## Configuration
//!
//! All settings can be configured via environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
//! - `DB_MIN_CONNECTIONS`: Minimum idle connections (default: 2)
//! - `DB_CONNECT_TIMEOUT_SECS`: Connection timeout (default: 10)
//! - `DB_IDLE_TIMEOUT_SECS`: Idle connection timeout (default: 300)
//! - `DB_MAX_LIFETIME_SECS`: Max connection lifetime (default: 1800)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;

use crate::config::env_or;
use crate::types::{GraphEdge, Occurrence, OccurrenceId, ProjectId};
use super::GraphStore;

/// Configuration for PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum connections in pool (default: 10).
    pub max_connections: u32,
    /// Minimum idle connections to keep warm (default: 2).
    pub min_connections: u32,
    /// Connection acquire timeout in seconds (default: 10).
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds (default: 300 = 5 min).
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds (default: 1800 = 30 min).
    pub max_lifetime_secs: u64,
}

impl PostgresConfig {
    /// Load configuration from environment variables with production defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/gitlabhq_development".to_string()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 10),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", 1800),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// PostgreSQL graph store.
///
/// Uses connection pooling with production-tuned settings.
pub struct PostgresGraphStore {
    pool: PgPool,
}

impl PostgresGraphStore {
    /// Create a new store with the given configuration.
    pub async fn new(config: PostgresConfig) -> Result<Self, sqlx::Error> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            connect_timeout_secs = config.connect_timeout_secs,
            idle_timeout_secs = config.idle_timeout_secs,
            max_lifetime_secs = config.max_lifetime_secs,
            "Initializing PostgreSQL connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a store from environment variables.
    pub async fn from_env() -> Result<Self, sqlx::Error> {
        Self::new(PostgresConfig::from_env()).await
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get pool statistics for monitoring.
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max: self.pool.options().get_max_connections(),
        }
    }

    /// Parse an occurrence from a database row.
    fn parse_occurrence_row(row: &PgRow) -> Result<Occurrence, PostgresError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let version: Option<String> = row.try_get("version")?;
        let package_manager: Option<String> = row.try_get("package_manager")?;
        let licenses: Option<serde_json::Value> = row.try_get("licenses")?;

        Ok(Occurrence {
            id: OccurrenceId::new(id),
            name,
            version,
            package_manager: package_manager.filter(|p| !p.is_empty()),
            licenses: parse_licenses(id, licenses)?,
        })
    }
}

/// Extract license identifiers from the `licenses` JSONB column.
///
/// Entries are objects carrying `spdx_identifier` and/or `name`; the SPDX
/// identifier wins when both are present.
fn parse_licenses(id: i64, value: Option<serde_json::Value>) -> Result<Vec<String>, PostgresError> {
    let entries = match value {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(serde_json::Value::Array(entries)) => entries,
        Some(other) => {
            return Err(PostgresError::MalformedRow {
                id,
                reason: format!("licenses is not an array: {}", other),
            })
        }
    };

    Ok(entries
        .iter()
        .filter_map(|entry| {
            entry.get("spdx_identifier")
                .or_else(|| entry.get("name"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .collect())
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStats {
    /// Current pool size.
    pub size: u32,
    /// Number of idle connections.
    pub idle: usize,
    /// Maximum pool size.
    pub max: u32,
}

/// Error type for PostgreSQL store.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Row carried data the store cannot interpret.
    #[error("Malformed occurrence row {id}: {reason}")]
    MalformedRow {
        /// Occurrence id of the offending row.
        id: i64,
        /// What was wrong with it.
        reason: String,
    },
}

#[async_trait]
impl GraphStore for PostgresGraphStore {
    type Error = PostgresError;

    async fn latest_snapshot(&self, project: ProjectId)
        -> Result<Option<DateTime<Utc>>, Self::Error>
    {
        let row = sqlx::query(
            r#"
            SELECT MAX(created_at) AS snapshot
            FROM sbom_graph_paths
            WHERE project_id = $1
            "#
        )
        .bind(project.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("snapshot")?)
    }

    async fn fetch_edge_batch(
        &self,
        project: ProjectId,
        snapshot: DateTime<Utc>,
        after: Option<GraphEdge>,
        batch_size: usize,
    ) -> Result<Vec<GraphEdge>, Self::Error> {
        let rows = sqlx::query(
            r#"
            SELECT ancestor_id, descendant_id
            FROM sbom_graph_paths
            WHERE project_id = $1
              AND created_at = $2
              AND ($3::bigint IS NULL OR (ancestor_id, descendant_id) > ($3, $4))
            ORDER BY ancestor_id, descendant_id
            LIMIT $5
            "#
        )
        .bind(project.get())
        .bind(snapshot)
        .bind(after.map(|e| e.ancestor.get()))
        .bind(after.map(|e| e.descendant.get()))
        .bind(batch_size as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<GraphEdge, PostgresError> {
                Ok(GraphEdge::new(
                    OccurrenceId::new(row.try_get("ancestor_id")?),
                    OccurrenceId::new(row.try_get("descendant_id")?),
                ))
            })
            .collect()
    }

    async fn resolve_occurrences(&self, ids: &[OccurrenceId])
        -> Result<Vec<Occurrence>, Self::Error>
    {
        let raw_ids: Vec<i64> = ids.iter().map(OccurrenceId::get).collect();
        let rows = sqlx::query(
            r#"
            SELECT o.id, c.name, v.version, o.package_manager, o.licenses
            FROM sbom_occurrences o
            JOIN sbom_components c ON c.id = o.component_id
            LEFT JOIN sbom_component_versions v ON v.id = o.component_version_id
            WHERE o.id = ANY($1)
            ORDER BY o.id
            "#
        )
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(Self::parse_occurrence_row)
            .collect()
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_licenses_prefers_spdx() {
        let value = json!([
            { "spdx_identifier": "MIT", "name": "MIT License" },
            { "name": "Custom License" },
            { "url": "https://example.com" }
        ]);

        let licenses = parse_licenses(1, Some(value)).unwrap();
        assert_eq!(licenses, vec!["MIT".to_string(), "Custom License".to_string()]);
    }

    #[test]
    fn test_parse_licenses_null() {
        assert!(parse_licenses(1, None).unwrap().is_empty());
        assert!(parse_licenses(1, Some(serde_json::Value::Null)).unwrap().is_empty());
    }

    #[test]
    fn test_parse_licenses_rejects_objects() {
        let result = parse_licenses(4, Some(json!({ "spdx_identifier": "MIT" })));
        assert!(matches!(result, Err(PostgresError::MalformedRow { id: 4, .. })));
    }
}
