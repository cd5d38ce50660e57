//! Request instruments: registration and recording

use std::fmt;
use std::sync::Arc;

use crate::config::DEFAULT_NAMESPACE;
use crate::error::RegistryError;
use crate::instrument::Instrument;
use crate::labels::RequestSample;
use crate::registry::{Counter, Distribution, Registry};

/// Handles to the four request instruments of one namespace.
///
/// Cloning is cheap; every clone records into the same registry state.
#[derive(Clone)]
pub struct ApiMetrics {
    namespace: String,
    response_time: Arc<dyn Distribution>,
    response_size: Arc<dyn Distribution>,
    request_count: Arc<dyn Counter>,
    request_bytes: Arc<dyn Counter>,
}

impl ApiMetrics {
    /// Build and register the four instruments under `namespace`.
    ///
    /// An empty namespace falls back to [`DEFAULT_NAMESPACE`].
    pub fn try_register(registry: &dyn Registry, namespace: &str) -> Result<Self, RegistryError> {
        let namespace = if namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            namespace
        };

        let response_time =
            registry.register_distribution(&Instrument::ResponseTime.describe(namespace))?;
        let response_size =
            registry.register_distribution(&Instrument::ResponseSize.describe(namespace))?;
        let request_count =
            registry.register_counter(&Instrument::RequestCount.describe(namespace))?;
        let request_bytes =
            registry.register_counter(&Instrument::RequestBytes.describe(namespace))?;

        tracing::info!(namespace = %namespace, "Registered API request instruments");

        Ok(Self {
            namespace: namespace.to_string(),
            response_time,
            response_size,
            request_count,
            request_bytes,
        })
    }

    /// Like [`ApiMetrics::try_register`], but a name collision aborts.
    ///
    /// A collision means the middleware was installed twice or two
    /// namespaces overlap, and recording into a half-registered set is not
    /// allowed.
    pub fn register(registry: &dyn Registry, namespace: &str) -> Self {
        match Self::try_register(registry, namespace) {
            Ok(metrics) => metrics,
            Err(e) => panic!("Failed to register API metrics: {}", e),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Record one request: one mutation per instrument, all with the same labels.
    ///
    /// Sizes are passed through as-is, including the unknown-size sentinel.
    pub fn record(&self, sample: &RequestSample) {
        let labels = &sample.labels;
        self.request_bytes.increment(labels, sample.request_bytes);
        self.request_count.increment(labels, 1);
        self.response_time.observe(labels, sample.elapsed_ms);
        self.response_size.observe(labels, sample.response_bytes as f64);
    }
}

impl fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::instrument::InstrumentDesc;
    use crate::labels::{LabelTuple, UNKNOWN_SIZE};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Increment(String, LabelTuple, i64),
        Observe(String, LabelTuple, f64),
    }

    #[derive(Default)]
    struct FakeRegistry {
        names: Mutex<HashSet<String>>,
        events: Arc<Mutex<Vec<Event>>>,
    }

    struct FakeInstrument {
        name: String,
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl Counter for FakeInstrument {
        fn increment(&self, labels: &LabelTuple, delta: i64) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Increment(self.name.clone(), labels.clone(), delta));
        }
    }

    impl Distribution for FakeInstrument {
        fn observe(&self, labels: &LabelTuple, value: f64) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Observe(self.name.clone(), labels.clone(), value));
        }
    }

    impl FakeRegistry {
        fn instrument(&self, desc: &InstrumentDesc) -> Result<Arc<FakeInstrument>, RegistryError> {
            let name = desc.full_name();
            if !self.names.lock().unwrap().insert(name.clone()) {
                return Err(RegistryError::AlreadyRegistered(name));
            }
            Ok(Arc::new(FakeInstrument {
                name,
                events: self.events.clone(),
            }))
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Registry for FakeRegistry {
        fn register_counter(
            &self,
            desc: &InstrumentDesc,
        ) -> Result<Arc<dyn Counter>, RegistryError> {
            let counter: Arc<dyn Counter> = self.instrument(desc)?;
            Ok(counter)
        }

        fn register_distribution(
            &self,
            desc: &InstrumentDesc,
        ) -> Result<Arc<dyn Distribution>, RegistryError> {
            let distribution: Arc<dyn Distribution> = self.instrument(desc)?;
            Ok(distribution)
        }
    }

    fn sample(host: &str, request_bytes: i64) -> RequestSample {
        RequestSample {
            labels: LabelTuple::new("GET", "/foo", "200", host),
            request_bytes,
            response_bytes: 20,
            elapsed_ms: 5.0,
        }
    }

    #[test]
    fn registers_all_four_instruments() {
        let registry = FakeRegistry::default();
        let metrics = ApiMetrics::try_register(&registry, "shop").unwrap();
        assert_eq!(metrics.namespace(), "shop");

        let names = registry.names.lock().unwrap();
        assert_eq!(names.len(), 4);
        assert!(names.contains("shop_api_response_time"));
        assert!(names.contains("shop_api_request_bytes"));
    }

    #[test]
    fn empty_namespace_uses_default() {
        let registry = FakeRegistry::default();
        let metrics = ApiMetrics::try_register(&registry, "").unwrap();
        assert_eq!(metrics.namespace(), "default");
        assert!(registry.names.lock().unwrap().contains("default_api_request_total"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = FakeRegistry::default();
        ApiMetrics::try_register(&registry, "default").unwrap();
        let err = ApiMetrics::try_register(&registry, "").unwrap_err();
        assert_eq!(
            err,
            RegistryError::AlreadyRegistered("default_api_response_time".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "Instrument already registered")]
    fn register_panics_on_collision() {
        let registry = FakeRegistry::default();
        ApiMetrics::register(&registry, "default");
        ApiMetrics::register(&registry, "default");
    }

    #[test]
    fn distinct_namespaces_share_a_registry() {
        let registry = FakeRegistry::default();
        ApiMetrics::register(&registry, "a");
        ApiMetrics::register(&registry, "b");
        assert_eq!(registry.names.lock().unwrap().len(), 8);
    }

    #[test]
    fn record_emits_one_mutation_per_instrument() {
        let registry = FakeRegistry::default();
        let metrics = ApiMetrics::register(&registry, "");
        metrics.record(&sample("1.2.3.4", 10));

        let labels = LabelTuple::new("GET", "/foo", "200", "1.2.3.4");
        assert_eq!(
            registry.events(),
            vec![
                Event::Increment("default_api_request_bytes".into(), labels.clone(), 10),
                Event::Increment("default_api_request_total".into(), labels.clone(), 1),
                Event::Observe("default_api_response_time".into(), labels.clone(), 5.0),
                Event::Observe("default_api_response_size".into(), labels, 20.0),
            ]
        );
    }

    #[test]
    fn unknown_sizes_are_passed_through() {
        let registry = FakeRegistry::default();
        let metrics = ApiMetrics::register(&registry, "");
        let mut s = sample("1.2.3.4", UNKNOWN_SIZE);
        s.response_bytes = UNKNOWN_SIZE;
        metrics.record(&s);

        let events = registry.events();
        assert!(matches!(&events[0], Event::Increment(_, _, -1)));
        assert!(matches!(&events[3], Event::Observe(_, _, v) if *v == -1.0));
    }

    #[test]
    fn clones_record_into_the_same_instruments() {
        let registry = FakeRegistry::default();
        let metrics = ApiMetrics::register(&registry, "");
        let clone = metrics.clone();
        metrics.record(&sample("1.2.3.4", 1));
        clone.record(&sample("5.6.7.8", 2));
        assert_eq!(registry.events().len(), 8);
    }
}
