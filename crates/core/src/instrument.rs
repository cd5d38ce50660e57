//! Instrument identities
//!
//! Every instrument is named `{namespace}_api_{name}` and partitioned by the
//! fixed [`LABEL_NAMES`].

/// Subsystem shared by all request instruments
pub const SUBSYSTEM: &str = "api";

/// Label dimensions attached to every recording, in order
pub const LABEL_NAMES: [&str; 4] = ["method", "endpoint", "status", "host"];

/// Aggregation performed by the registry for an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    /// Monotonic sum
    Counter,
    /// Individual observations summarized by the registry (quantiles, sum, count)
    Distribution,
}

/// Unit of the recorded values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentUnit {
    Milliseconds,
    Bytes,
    Count,
}

/// The four request instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    ResponseTime,
    ResponseSize,
    RequestCount,
    RequestBytes,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::ResponseTime,
        Instrument::ResponseSize,
        Instrument::RequestCount,
        Instrument::RequestBytes,
    ];

    pub fn kind(self) -> InstrumentKind {
        match self {
            Instrument::ResponseTime | Instrument::ResponseSize => InstrumentKind::Distribution,
            Instrument::RequestCount | Instrument::RequestBytes => InstrumentKind::Counter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::ResponseTime => "response_time",
            Instrument::ResponseSize => "response_size",
            Instrument::RequestCount => "request_total",
            Instrument::RequestBytes => "request_bytes",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Instrument::ResponseTime => "Response time of each request in milliseconds.",
            Instrument::ResponseSize => "Response body size of each request in bytes.",
            Instrument::RequestCount => "Total number of requests.",
            Instrument::RequestBytes => "Total request body bytes.",
        }
    }

    pub fn unit(self) -> InstrumentUnit {
        match self {
            Instrument::ResponseTime => InstrumentUnit::Milliseconds,
            Instrument::ResponseSize | Instrument::RequestBytes => InstrumentUnit::Bytes,
            Instrument::RequestCount => InstrumentUnit::Count,
        }
    }

    /// Describe this instrument under the given namespace
    pub fn describe(self, namespace: &str) -> InstrumentDesc {
        InstrumentDesc {
            namespace: namespace.to_string(),
            subsystem: SUBSYSTEM,
            name: self.name(),
            help: self.help(),
            unit: self.unit(),
            kind: self.kind(),
        }
    }
}

/// Everything a registry needs to construct an instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentDesc {
    pub namespace: String,
    pub subsystem: &'static str,
    pub name: &'static str,
    pub help: &'static str,
    pub unit: InstrumentUnit,
    pub kind: InstrumentKind,
}

impl InstrumentDesc {
    /// Fully qualified name, joined Prometheus-style. Empty parts are skipped.
    pub fn full_name(&self) -> String {
        [self.namespace.as_str(), self.subsystem, self.name]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        &LABEL_NAMES
    }
}
