//! apimetrics-core: Request instrumentation model
//!
//! This crate defines the four per-request instruments, their label tuple,
//! the middleware configuration, and the registry capabilities a metrics
//! backend has to provide. It knows nothing about any web framework.

pub mod config;
pub mod error;
pub mod instrument;
pub mod labels;
pub mod metrics;
pub mod registry;

pub use config::{DEFAULT_METRICS_PATH, DEFAULT_NAMESPACE, MetricsConfig};
pub use error::RegistryError;
pub use instrument::{
    Instrument, InstrumentDesc, InstrumentKind, InstrumentUnit, LABEL_NAMES, SUBSYSTEM,
};
pub use labels::{LabelTuple, RequestSample, UNKNOWN_SIZE};
pub use metrics::ApiMetrics;
pub use registry::{Counter, Distribution, Registry};
