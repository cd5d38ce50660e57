//! Request metrics middleware
//!
//! Wraps the whole downstream chain, then records `response_time`,
//! `response_size`, `request_total` and `request_bytes` for every request
//! except those targeting the exposition path. Labels are
//! method/endpoint/status/host, where endpoint is the raw request target.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use apimetrics_core::{
    ApiMetrics, LabelTuple, MetricsConfig, Registry, RegistryError, RequestSample, UNKNOWN_SIZE,
};
use axum::{
    Router,
    body::HttpBody,
    extract::{ConnectInfo, OriginalUri, Request, State},
    http::{HeaderMap, Method, header},
    middleware::{self as axum_mw, Next},
    response::Response,
};

/// Host label used when the server was not started with connect info
pub const UNKNOWN_HOST: &str = "unknown";

/// State owned by the interceptor
#[derive(Debug)]
pub struct MetricsState {
    config: MetricsConfig,
    metrics: ApiMetrics,
}

impl MetricsState {
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ApiMetrics {
        &self.metrics
    }
}

/// Installs the metrics interceptor around a router.
#[derive(Debug, Clone)]
pub struct MetricsLayer {
    state: Arc<MetricsState>,
}

impl MetricsLayer {
    /// Resolve `config` and register the instruments in `registry`.
    pub fn try_new(config: MetricsConfig, registry: &dyn Registry) -> Result<Self, RegistryError> {
        let config = config.resolved();
        let metrics = ApiMetrics::try_register(registry, &config.namespace)?;
        Ok(Self {
            state: Arc::new(MetricsState { config, metrics }),
        })
    }

    /// Same as [`MetricsLayer::try_new`] but panics on a duplicate registration.
    pub fn new(config: MetricsConfig, registry: &dyn Registry) -> Self {
        match Self::try_new(config, registry) {
            Ok(layer) => layer,
            Err(e) => panic!("Failed to install metrics middleware: {}", e),
        }
    }

    pub fn metrics_path(&self) -> &str {
        &self.state.config().metrics_path
    }

    pub fn state(&self) -> &Arc<MetricsState> {
        &self.state
    }

    /// Wrap every route of `router`. Apply last so the interceptor is the
    /// outermost layer and times the whole chain.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(axum_mw::from_fn_with_state(
            self.state.clone(),
            metrics_middleware,
        ))
    }
}

/// Middleware that records the four request instruments after the
/// downstream chain returns.
pub async fn metrics_middleware(
    State(state): State<Arc<MetricsState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    // Bodies of HEAD responses are never written to the client
    let head_request = *request.method() == Method::HEAD;
    let method = request.method().to_string();
    let endpoint = request_target(&request);
    let host = remote_host(&request);
    let request_bytes = request_size(&request);

    let response = next.run(request).await;

    // Scrapes of the exposition endpoint are not request traffic
    if endpoint == state.config().metrics_path {
        return response;
    }

    let status = response.status().as_u16().to_string();
    let response_bytes = if head_request {
        0
    } else {
        response_size(&response)
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    state.metrics().record(&RequestSample {
        labels: LabelTuple {
            method,
            endpoint,
            status,
            host,
        },
        request_bytes,
        response_bytes,
        elapsed_ms,
    });

    response
}

/// Raw request target (path and query) as the client sent it.
fn request_target(request: &Request) -> String {
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn remote_host(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

fn content_length(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn exact_size<B: HttpBody>(body: &B) -> Option<i64> {
    body.size_hint().exact().and_then(|n| i64::try_from(n).ok())
}

fn request_size(request: &Request) -> i64 {
    content_length(request.headers())
        .or_else(|| exact_size(request.body()))
        .unwrap_or(UNKNOWN_SIZE)
}

fn response_size(response: &Response) -> i64 {
    exact_size(response.body())
        .or_else(|| content_length(response.headers()))
        .unwrap_or(UNKNOWN_SIZE)
}
