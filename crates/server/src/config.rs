//! Server configuration

use apimetrics_core::MetricsConfig;

/// Server configuration loaded from environment variables
pub struct Config {
    pub bind_address: String,
    /// Empty values are resolved to defaults when the middleware is built
    pub metrics: MetricsConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            metrics: MetricsConfig {
                metrics_path: std::env::var("METRICS_PATH").unwrap_or_default(),
                namespace: std::env::var("METRICS_NAMESPACE").unwrap_or_default(),
            },
        }
    }
}
