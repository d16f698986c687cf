//! Instrumentation hook for resolved pages.
//!
//! The resolver reports how many cyclic and non-cyclic paths each page
//! carried. Reporting is fire-and-forget: a failing backend is logged and
//! never changes the page returned to the caller.
//!
//! ## Metrics Emitted
//!
//! | Metric | Labels |
//! |--------|--------|
//! | `dependency_paths_found_total` | `cyclic = "true" \| "false"` |

use std::collections::HashMap;
use std::sync::Mutex;

/// Counter of paths returned, split by the `cyclic` label.
pub const PATHS_FOUND_METRIC: &str = "dependency_paths_found_total";

/// Error reported by a metrics backend.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Metrics backend failed: {0}")]
pub struct MetricsError(pub String);

/// Metrics counter interface.
///
/// Implementations can be provided for different metrics backends.
pub trait PathMetrics: Send + Sync {
    /// Increment a counter by `value`.
    fn increment_by(&self, metric_name: &str, value: u64, labels: &[(&str, &str)])
        -> Result<(), MetricsError>;

    /// Record the path counts of one resolved page.
    fn record_path_counts(&self, cyclic: usize, non_cyclic: usize) -> Result<(), MetricsError> {
        self.increment_by(PATHS_FOUND_METRIC, cyclic as u64, &[("cyclic", "true")])?;
        self.increment_by(PATHS_FOUND_METRIC, non_cyclic as u64, &[("cyclic", "false")])
    }
}

/// No-op metrics implementation.
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl PathMetrics for NoOpMetrics {
    fn increment_by(&self, _metric_name: &str, _value: u64, _labels: &[(&str, &str)])
        -> Result<(), MetricsError>
    {
        Ok(())
    }
}

/// Emits counters as structured `tracing` events for log-based aggregation.
#[derive(Debug, Default)]
pub struct TracingMetrics;

impl PathMetrics for TracingMetrics {
    fn increment_by(&self, metric_name: &str, value: u64, labels: &[(&str, &str)])
        -> Result<(), MetricsError>
    {
        tracing::info!(
            target: "dependency_paths::metrics",
            metric = metric_name,
            value,
            labels = ?labels,
            "counter_metric"
        );
        Ok(())
    }
}

/// In-memory metrics for testing.
#[derive(Debug, Default)]
pub struct TestMetrics {
    /// Counter values keyed by `name:labels`.
    pub counters: Mutex<HashMap<String, u64>>,
}

impl PathMetrics for TestMetrics {
    fn increment_by(&self, metric_name: &str, value: u64, labels: &[(&str, &str)])
        -> Result<(), MetricsError>
    {
        let key = format!("{}:{:?}", metric_name, labels);
        let mut counters = self.counters
            .lock()
            .map_err(|e| MetricsError(e.to_string()))?;
        *counters.entry(key).or_insert(0) += value;
        Ok(())
    }
}

impl TestMetrics {
    /// Sum of every counter whose key starts with `prefix`.
    pub fn get_count(&self, prefix: &str) -> u64 {
        self.counters
            .lock()
            .map(|counters| {
                counters
                    .iter()
                    .filter(|(k, _)| k.starts_with(prefix))
                    .map(|(_, v)| v)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Value of the `dependency_paths_found_total` counter for one label value.
    pub fn paths_found(&self, cyclic: bool) -> u64 {
        let label = if cyclic { "true" } else { "false" };
        self.get_count(&format!("{}:{:?}", PATHS_FOUND_METRIC, [("cyclic", label)]))
    }
}
