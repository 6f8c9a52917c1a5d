use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::core::{AlgoError, AlgoResult};

const DEFAULT_BUCKETS: &[f64] = &[
    0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0,
];

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_ERROR: &str = "error";

/// Prometheus collectors for service calls, registered on a registry owned
/// by the service container instead of the process-wide default registry.
pub struct ServiceMetrics {
    registry: Registry,
    calls: IntCounterVec,
    latency: HistogramVec,
}

impl ServiceMetrics {
    pub fn new() -> AlgoResult<Self> {
        let registry = Registry::new();

        let calls = IntCounterVec::new(
            Opts::new(
                "algosix_calls_total",
                "The total number of service calls since algosix started",
            ),
            &[
                "service", // median / palindrome_pairs / palindrome_check / ...
                "outcome", // success / error
            ],
        )
        .map_err(metrics_error)?;

        let latency = HistogramVec::new(
            HistogramOpts::new(
                "algosix_call_duration_ms",
                "Service call latency in milliseconds",
            )
            .buckets(DEFAULT_BUCKETS.to_vec()),
            &["service"],
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(calls.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(latency.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            registry,
            calls,
            latency,
        })
    }

    pub fn observe_success(&self, service: &str, elapsed_ms: f64) {
        self.calls
            .with_label_values(&[service, OUTCOME_SUCCESS])
            .inc();
        self.latency.with_label_values(&[service]).observe(elapsed_ms);
    }

    pub fn observe_error(&self, service: &str) {
        self.calls.with_label_values(&[service, OUTCOME_ERROR]).inc();
    }

    pub fn call_count(&self, service: &str, outcome: &str) -> u64 {
        self.calls.with_label_values(&[service, outcome]).get()
    }

    /// Renders every collector in the Prometheus text exposition format.
    pub fn encode_text(&self) -> AlgoResult<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        Ok(buffer)
    }
}

fn metrics_error(e: prometheus::Error) -> AlgoError {
    AlgoError::Internal(format!("prometheus: {e}"))
}
