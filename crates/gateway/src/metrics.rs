use inference::ErrorKind;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

/// Request-level instruments. No-ops unless a meter provider was installed
/// by `common::TelemetryGuard`.
#[derive(Clone)]
pub struct PredictMetrics {
    duration: Histogram<f64>,
    requests: Counter<u64>,
    failures: Counter<u64>,
}

impl PredictMetrics {
    pub fn new(meter_name: &'static str) -> Self {
        let meter = global::meter(meter_name);
        let latency_buckets = [
            0.005, 0.01, 0.02, 0.03, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 1.0, 2.0,
        ];
        let duration = meter
            .f64_histogram("predict_duration_seconds")
            .with_description("Time to answer a prediction (decode + infer + postprocess)")
            .with_unit("s")
            .with_boundaries(latency_buckets.to_vec())
            .build();
        let requests = meter
            .u64_counter("predict_requests_total")
            .with_description("Successful predictions by returned label")
            .build();
        let failures = meter
            .u64_counter("predict_failures_total")
            .with_description("Failed predictions by error kind")
            .build();

        Self {
            duration,
            requests,
            failures,
        }
    }

    pub fn record_success(&self, elapsed_secs: f64, class_name: &str) {
        self.duration.record(elapsed_secs, &[]);
        self.requests
            .add(1, &[KeyValue::new("class_name", class_name.to_string())]);
    }

    pub fn record_failure(&self, elapsed_secs: f64, kind: ErrorKind) {
        self.duration.record(elapsed_secs, &[]);
        self.failures.add(1, &[KeyValue::new("kind", kind.as_str())]);
    }
}
