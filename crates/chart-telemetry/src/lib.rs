//! # Chart Telemetry
//!
//! Logging and metrics for the render pipeline.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter` and a pretty or
//!   JSON formatter
//! - **Metrics**: Prometheus counters and histograms for renders, fetches
//!   and subscriptions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chart_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `anychart` | Service name in startup logs |
//! | `AC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `AC_LOG_FORMAT` | `pretty` (`json` in containers) | `pretty`, `json` or `off` |

mod config;
mod logging;
pub mod metrics;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, ACTIVE_SUBSCRIPTIONS, FETCH_DURATION,
    FETCH_FAILURES, RENDERS_TOTAL, RENDER_DURATION, SUBSCRIPTION_TRIGGERS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the logging subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
