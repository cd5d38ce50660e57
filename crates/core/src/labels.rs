//! Per-request label tuple and measured values

use crate::instrument::LABEL_NAMES;

/// Sentinel for a size the framework could not determine
pub const UNKNOWN_SIZE: i64 = -1;

/// Dimensions shared by the four recordings of a single request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelTuple {
    pub method: String,
    /// Raw request target, not a route template
    pub endpoint: String,
    /// Decimal status code
    pub status: String,
    /// Remote address of the client
    pub host: String,
}

impl LabelTuple {
    pub fn new(
        method: impl Into<String>,
        endpoint: impl Into<String>,
        status: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
            status: status.into(),
            host: host.into(),
        }
    }

    /// Label values in [`LABEL_NAMES`] order
    pub fn values(&self) -> [&str; 4] {
        [
            self.method.as_str(),
            self.endpoint.as_str(),
            self.status.as_str(),
            self.host.as_str(),
        ]
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        LABEL_NAMES.into_iter().zip(self.values())
    }
}

/// Everything measured for one request/response pair
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSample {
    pub labels: LabelTuple,
    /// Request content length, or [`UNKNOWN_SIZE`]
    pub request_bytes: i64,
    /// Response body size, or [`UNKNOWN_SIZE`]
    pub response_bytes: i64,
    /// Wall-clock time of the downstream chain
    pub elapsed_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_follow_label_name_order() {
        let labels = LabelTuple::new("GET", "/foo?x=1", "200", "1.2.3.4");
        let pairs: Vec<_> = labels.pairs().collect();
        assert_eq!(
            pairs,
            vec![
                ("method", "GET"),
                ("endpoint", "/foo?x=1"),
                ("status", "200"),
                ("host", "1.2.3.4"),
            ]
        );
    }
}
