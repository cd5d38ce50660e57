//! Registry backed by a `metrics` recorder
//!
//! The recorder is owned by the registry instead of being installed as the
//! process-wide global, so every app (and every test) gets isolated state.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use apimetrics_core::{
    Counter, Distribution, InstrumentDesc, InstrumentUnit, LabelTuple, Registry, RegistryError,
};
use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Registry over any [`Recorder`]. Distributions map to histograms, which
/// the Prometheus exporter renders as summaries.
pub struct RecorderRegistry<R> {
    recorder: Arc<R>,
    registered: Mutex<HashSet<String>>,
}

impl<R> RecorderRegistry<R>
where
    R: Recorder + Send + Sync + 'static,
{
    pub fn new(recorder: R) -> Self {
        Self {
            recorder: Arc::new(recorder),
            registered: Mutex::new(HashSet::new()),
        }
    }

    /// Reserve the full name of `desc`, failing if it is taken or is not a
    /// valid Prometheus name.
    fn claim(&self, desc: &InstrumentDesc) -> Result<KeyName, RegistryError> {
        let name = desc.full_name();
        if !is_valid_name(&name, true) {
            return Err(RegistryError::InvalidName(name));
        }
        if let Some(label) = desc.label_names().iter().find(|l| !is_valid_name(l, false)) {
            return Err(RegistryError::InvalidName(format!("{}{{{}}}", name, label)));
        }

        let mut registered = self
            .registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !registered.insert(name.clone()) {
            return Err(RegistryError::AlreadyRegistered(name));
        }

        Ok(KeyName::from(name))
    }

    fn instrument(&self, name: KeyName) -> Arc<RecorderInstrument<R>> {
        Arc::new(RecorderInstrument {
            recorder: self.recorder.clone(),
            name,
        })
    }
}

impl<R> Registry for RecorderRegistry<R>
where
    R: Recorder + Send + Sync + 'static,
{
    fn register_counter(&self, desc: &InstrumentDesc) -> Result<Arc<dyn Counter>, RegistryError> {
        let name = self.claim(desc)?;
        self.recorder.describe_counter(
            name.clone(),
            Some(unit(desc.unit)),
            SharedString::from(desc.help),
        );
        let counter: Arc<dyn Counter> = self.instrument(name);
        Ok(counter)
    }

    fn register_distribution(
        &self,
        desc: &InstrumentDesc,
    ) -> Result<Arc<dyn Distribution>, RegistryError> {
        let name = self.claim(desc)?;
        self.recorder.describe_histogram(
            name.clone(),
            Some(unit(desc.unit)),
            SharedString::from(desc.help),
        );
        let distribution: Arc<dyn Distribution> = self.instrument(name);
        Ok(distribution)
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`; colons are reserved for metric names.
fn is_valid_name(name: &str, allow_colon: bool) -> bool {
    let valid = |c: char, first: bool| {
        c.is_ascii_alphabetic()
            || c == '_'
            || (allow_colon && c == ':')
            || (!first && c.is_ascii_digit())
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => valid(first, true) && chars.all(|c| valid(c, false)),
        None => false,
    }
}

fn unit(unit: InstrumentUnit) -> Unit {
    match unit {
        InstrumentUnit::Milliseconds => Unit::Milliseconds,
        InstrumentUnit::Bytes => Unit::Bytes,
        InstrumentUnit::Count => Unit::Count,
    }
}

/// Handle resolving `name + labels` against the recorder on every call
struct RecorderInstrument<R> {
    recorder: Arc<R>,
    name: KeyName,
}

impl<R> RecorderInstrument<R> {
    fn key(&self, labels: &LabelTuple) -> Key {
        let labels: Vec<Label> = labels
            .pairs()
            .map(|(name, value)| Label::new(name, value.to_string()))
            .collect();
        Key::from_parts(self.name.clone(), labels)
    }
}

impl<R> Counter for RecorderInstrument<R>
where
    R: Recorder + Send + Sync + 'static,
{
    fn increment(&self, labels: &LabelTuple, delta: i64) {
        // Counters are unsigned here; the unknown-size sentinel adds nothing
        // but still creates the series.
        let delta = u64::try_from(delta).unwrap_or(0);
        self.recorder
            .register_counter(&self.key(labels), &METADATA)
            .increment(delta);
    }
}

impl<R> Distribution for RecorderInstrument<R>
where
    R: Recorder + Send + Sync + 'static,
{
    fn observe(&self, labels: &LabelTuple, value: f64) {
        self.recorder
            .register_histogram(&self.key(labels), &METADATA)
            .record(value);
    }
}

/// Fresh Prometheus-backed registry plus the handle used to render it.
pub fn prometheus_registry() -> (RecorderRegistry<PrometheusRecorder>, PrometheusHandle) {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    (RecorderRegistry::new(recorder), handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_names_are_validated() {
        assert!(is_valid_name("default_api_request_total", true));
        assert!(is_valid_name("ns:api_x", true));
        assert!(!is_valid_name("ns:api_x", false));
        assert!(!is_valid_name("my-app_api_request_total", true));
        assert!(!is_valid_name("1ns_api_request_total", true));
        assert!(!is_valid_name("", true));
    }
}
