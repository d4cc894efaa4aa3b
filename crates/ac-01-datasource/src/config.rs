//! Configuration for the reference data-source adapters

use std::env;
use std::time::Duration;

/// Adapter configuration.
#[derive(Debug, Clone)]
pub struct DatasourceConfig {
    /// Period between synthetic fixture stream events.
    pub fixture_interval: Duration,
    /// Concurrent blocking database calls allowed.
    ///
    /// Sized independently from the number of concurrent renders.
    pub blocking_pool_size: usize,
    /// Whole-request timeout for the REST adapter.
    pub http_timeout: Duration,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            fixture_interval: Duration::from_secs(2),
            blocking_pool_size: 4,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl DatasourceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AC_FIXTURE_INTERVAL_MS`: fixture event period (default: 2000)
    /// - `AC_DB_POOL_SIZE`: blocking database workers (default: 4, min 1)
    /// - `AC_HTTP_TIMEOUT_MS`: REST request timeout (default: 10000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            fixture_interval: env_millis("AC_FIXTURE_INTERVAL_MS")
                .unwrap_or(defaults.fixture_interval),

            blocking_pool_size: env::var("AC_DB_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|n| n.max(1))
                .unwrap_or(defaults.blocking_pool_size),

            http_timeout: env_millis("AC_HTTP_TIMEOUT_MS").unwrap_or(defaults.http_timeout),
        }
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}
