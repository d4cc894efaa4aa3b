//! Prometheus metrics for the render pipeline.
//!
//! All metrics follow the naming convention: `ac_<component>_<metric>_<unit>`
//!
//! Metrics record values whether or not `register_metrics` has been
//! called; registration only exposes them through `encode_metrics`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts,
    HistogramVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // RENDER METRICS
    // =========================================================================

    /// Renders by outcome
    pub static ref RENDERS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("ac_render_renders_total", "Chart renders by outcome"),
        &["outcome"]  // outcome: success/not_found/failure
    ).expect("metric creation failed");

    /// End-to-end render duration
    pub static ref RENDER_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ac_render_duration_seconds",
            "Time from template lookup to substituted option"
        ).buckets(exponential_buckets(0.0005, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // FETCH METRICS
    // =========================================================================

    /// Per-adapter fetch duration (successful fetches only)
    pub static ref FETCH_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ac_fetch_duration_seconds",
            "Time spent in adapter execute calls"
        ).buckets(exponential_buckets(0.0005, 2.0, 16).expect("valid buckets")),
        &["adapter"]
    ).expect("metric creation failed");

    /// Failed fetches by adapter and kind
    pub static ref FETCH_FAILURES: CounterVec = CounterVec::new(
        Opts::new("ac_fetch_failures_total", "Failed adapter fetches"),
        &["adapter", "kind"]  // kind: error/timeout
    ).expect("metric creation failed");

    // =========================================================================
    // SUBSCRIPTION METRICS
    // =========================================================================

    /// Upstream events that triggered a re-render
    pub static ref SUBSCRIPTION_TRIGGERS: Counter = Counter::new(
        "ac_subscription_triggers_total",
        "Streaming events received by subscription drivers"
    ).expect("metric creation failed");

    /// Currently running subscription drivers
    pub static ref ACTIVE_SUBSCRIPTIONS: Gauge = Gauge::new(
        "ac_subscription_active",
        "Number of running subscription drivers"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(RENDERS_TOTAL.clone()),
        Box::new(RENDER_DURATION.clone()),
        Box::new(FETCH_DURATION.clone()),
        Box::new(FETCH_FAILURES.clone()),
        Box::new(SUBSCRIPTION_TRIGGERS.clone()),
        Box::new(ACTIVE_SUBSCRIPTIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all registered metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Record the outcome of one render.
pub fn record_render(outcome: &str) {
    RENDERS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record a successful fetch and its latency.
pub fn record_fetch(adapter: &str, seconds: f64) {
    FETCH_DURATION.with_label_values(&[adapter]).observe(seconds);
}

/// Record a failed fetch.
pub fn record_fetch_failure(adapter: &str, kind: &str) {
    FETCH_FAILURES.with_label_values(&[adapter, kind]).inc();
}
