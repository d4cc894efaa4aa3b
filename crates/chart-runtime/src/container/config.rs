//! # Runtime Configuration
//!
//! Unified configuration for every crate plus the demo driver settings.

use std::env;
use std::path::PathBuf;

use ac_01_datasource::DatasourceConfig;
use ac_03_render_engine::EngineConfig;
use chart_telemetry::TelemetryConfig;

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
    /// Reference adapter configuration.
    pub datasource: DatasourceConfig,
    /// Render and subscription configuration.
    pub engine: EngineConfig,
    /// Persist templates to this JSON file instead of memory.
    pub template_file: Option<PathBuf>,
    /// Install the demo templates into an empty store.
    pub seed_demo: bool,
    /// Chart to follow live after the initial render pass.
    pub demo_chart: String,
    /// Live renders to print before exiting; 0 skips live mode.
    pub live_events: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            datasource: DatasourceConfig::default(),
            engine: EngineConfig::default(),
            template_file: None,
            seed_demo: true,
            demo_chart: "sales-bar".to_string(),
            live_events: 3,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AC_TEMPLATE_FILE`: JSON template file (default: in-memory store)
    /// - `AC_SEED_DEMO`: seed demo templates (default: true)
    /// - `AC_DEMO_CHART`: chart followed live (default: sales-bar)
    /// - `AC_LIVE_EVENTS`: live renders to print (default: 3)
    ///
    /// Telemetry, adapter and engine settings are read by their own
    /// `from_env` constructors.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            telemetry: TelemetryConfig::from_env(),
            datasource: DatasourceConfig::from_env(),
            engine: EngineConfig::from_env(),

            template_file: env::var("AC_TEMPLATE_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            seed_demo: env::var("AC_SEED_DEMO")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.seed_demo),

            demo_chart: env::var("AC_DEMO_CHART").unwrap_or(defaults.demo_chart),

            live_events: env::var("AC_LIVE_EVENTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.live_events),
        }
    }
}
