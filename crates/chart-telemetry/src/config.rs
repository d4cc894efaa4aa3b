//! Logging configuration.

use std::env;
use std::str::FromStr;

/// How log events are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored.
    Pretty,
    /// One JSON object per event.
    Json,
    /// Filter installed, nothing printed.
    Off,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "off" | "none" => Ok(Self::Off),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Reported in the startup log line.
    pub service_name: String,
    /// `EnvFilter` directive, e.g. `info` or `ac_03_render_engine=debug,info`.
    pub log_level: String,
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "anychart".to_string(),
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl TelemetryConfig {
    /// Read `OTEL_SERVICE_NAME`, `AC_LOG_LEVEL` (falling back to `RUST_LOG`)
    /// and `AC_LOG_FORMAT` (`pretty`, `json` or `off`).
    ///
    /// Without `AC_LOG_FORMAT`, containers (Kubernetes or `DOCKER_CONTAINER`)
    /// log JSON and everything else logs pretty text. An unrecognized format
    /// falls back to the same default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let in_container =
            env::var_os("KUBERNETES_SERVICE_HOST").is_some() || env::var_os("DOCKER_CONTAINER").is_some();
        let detected = if in_container {
            LogFormat::Json
        } else {
            defaults.format
        };

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: env::var("AC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            format: env::var("AC_LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(detected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" text ".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("none".parse::<LogFormat>(), Ok(LogFormat::Off));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "anychart");
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
