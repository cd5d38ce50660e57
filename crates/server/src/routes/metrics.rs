//! Exposition endpoint
//!
//! Rendering is delegated to the Prometheus exporter; this only serves it.

use axum::{Extension, http::header, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Content type of the Prometheus text format
const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// GET {metrics_path} - Render the registry for a scrape
pub async fn get(Extension(handle): Extension<PrometheusHandle>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, TEXT_FORMAT)], handle.render())
}
