//! apimetrics-server library crate
//!
//! Exposes the request metrics middleware, the `metrics`-backed registry and
//! `build_app` for integration tests. The binary entrypoint is in `main.rs`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod registry;
mod routes;

use apimetrics_core::Registry;
use axum::{Extension, Router, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use config::Config;
pub use error::AppError;
pub use middleware::MetricsLayer;
pub use registry::{RecorderRegistry, prometheus_registry};

/// Paths served by the application itself
const APP_ROUTES: [&str; 2] = ["/health", "/hello"];

/// Build the application router with the metrics interceptor installed.
///
/// Registers the request instruments in `registry` and serves `handle` at
/// the configured exposition path. The path is checked before any instrument
/// is registered.
pub fn try_build_app(
    config: &Config,
    registry: &dyn Registry,
    handle: PrometheusHandle,
) -> Result<Router, AppError> {
    let metrics_path = config.metrics.clone().resolved().metrics_path;
    if !metrics_path.starts_with('/') {
        return Err(AppError::RelativeMetricsPath(metrics_path));
    }
    if APP_ROUTES.contains(&metrics_path.as_str()) {
        return Err(AppError::MetricsPathConflict(metrics_path));
    }

    let metrics = MetricsLayer::try_new(config.metrics.clone(), registry)?;
    tracing::info!(path = %metrics.metrics_path(), "Serving metrics");

    let app = Router::new()
        .route(APP_ROUTES[0], get(routes::health::check))
        .route(APP_ROUTES[1], get(routes::hello))
        .route(metrics.metrics_path(), get(routes::metrics::get))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(handle)),
        );

    Ok(metrics.apply(app))
}

/// Same as [`try_build_app`], but a bad configuration or a duplicate
/// registration aborts startup.
pub fn build_app(config: &Config, registry: &dyn Registry, handle: PrometheusHandle) -> Router {
    match try_build_app(config, registry, handle) {
        Ok(app) => app,
        Err(e) => panic!("Failed to build application: {}", e),
    }
}
