//! HTTP middleware

pub mod metrics;

pub use metrics::{MetricsLayer, MetricsState, metrics_middleware};
