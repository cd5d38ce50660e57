//! Application startup errors

use apimetrics_core::RegistryError;
use thiserror::Error;

/// Reasons the application router cannot be built
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid METRICS_PATH {0:?}: must start with '/'")]
    RelativeMetricsPath(String),

    #[error("METRICS_PATH {0:?} collides with an application route")]
    MetricsPathConflict(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
