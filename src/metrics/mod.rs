//! Prometheus metrics for the HTTP surface and the signal pipeline

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: Gauge,
    pub http_request_duration_seconds: Histogram,
    pub signals_assembled_total: IntCounter,
    pub signal_assembly_duration_seconds: Histogram,
    pub upstream_failures_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_requests_in_flight = Gauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let signals_assembled_total =
            IntCounter::new("signals_assembled_total", "Total number of assembled signals")?;
        let signal_assembly_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "signal_assembly_duration_seconds",
                "Time spent assembling one signal",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        let upstream_failures_total = IntCounterVec::new(
            Opts::new("upstream_failures_total", "Upstream source failures"),
            &["source"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(signals_assembled_total.clone()))?;
        registry.register(Box::new(signal_assembly_duration_seconds.clone()))?;
        registry.register(Box::new(upstream_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            signals_assembled_total,
            signal_assembly_duration_seconds,
            upstream_failures_total,
        })
    }

    pub fn record_upstream_failure(&self, source: &str) {
        self.upstream_failures_total
            .with_label_values(&[source])
            .inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
