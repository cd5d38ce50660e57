//! Capabilities a metrics backend must provide
//!
//! Instruments are looked up by name and label values on every call, so a
//! backend only needs thread-safe `increment` / `observe` primitives plus a
//! registration step that rejects duplicate names.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::instrument::InstrumentDesc;
use crate::labels::LabelTuple;

/// Monotonic counter partitioned by [`LabelTuple`]
pub trait Counter: Send + Sync {
    fn increment(&self, labels: &LabelTuple, delta: i64);
}

/// Observation sink summarized by the backend
pub trait Distribution: Send + Sync {
    fn observe(&self, labels: &LabelTuple, value: f64);
}

/// A registry that owns instrument state
pub trait Registry: Send + Sync {
    /// Register a counter. Fails if the full name is already taken.
    fn register_counter(&self, desc: &InstrumentDesc) -> Result<Arc<dyn Counter>, RegistryError>;

    /// Register a distribution. Fails if the full name is already taken.
    fn register_distribution(
        &self,
        desc: &InstrumentDesc,
    ) -> Result<Arc<dyn Distribution>, RegistryError>;
}
