//! Interceptor configuration

use serde::{Deserialize, Serialize};

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "default";

/// Exposition path used when none is configured
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Metrics middleware configuration.
///
/// Empty fields fall back to [`DEFAULT_METRICS_PATH`] and
/// [`DEFAULT_NAMESPACE`] once [`MetricsConfig::resolved`] is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Request target of the exposition endpoint; requests to it are not recorded
    pub metrics_path: String,
    /// Prometheus namespace prefixed to every instrument name
    pub namespace: String,
}

impl MetricsConfig {
    pub fn new(metrics_path: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metrics_path: metrics_path.into(),
            namespace: namespace.into(),
        }
    }

    pub fn with_metrics_path(mut self, metrics_path: impl Into<String>) -> Self {
        self.metrics_path = metrics_path.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Fill empty fields with their defaults. Non-empty values are kept verbatim.
    pub fn resolved(mut self) -> Self {
        if self.namespace.is_empty() {
            self.namespace = DEFAULT_NAMESPACE.to_string();
        }
        if self.metrics_path.is_empty() {
            self.metrics_path = DEFAULT_METRICS_PATH.to_string();
        }
        self
    }
}
