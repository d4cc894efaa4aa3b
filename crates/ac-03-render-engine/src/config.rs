//! Render engine configuration

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Fetch time budgets.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Budget for one `execute` call when the adapter has no override.
    pub default_fetch_timeout: Duration,
    /// Per-adapter budgets keyed by adapter id.
    pub adapter_timeouts: HashMap<String, Duration>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_fetch_timeout: Duration::from_secs(30),
            adapter_timeouts: HashMap::new(),
        }
    }
}

impl RenderConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AC_FETCH_TIMEOUT_MS`: default fetch budget (default: 30000)
    /// - `AC_ADAPTER_TIMEOUTS`: overrides as `id=ms` pairs separated by
    ///   commas, e.g. `rest=5000,database=15000`. Malformed pairs are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = env::var("AC_FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.default_fetch_timeout = Duration::from_millis(ms);
        }

        if let Ok(overrides) = env::var("AC_ADAPTER_TIMEOUTS") {
            config.adapter_timeouts = parse_timeouts(&overrides);
        }

        config
    }

    /// Set a budget for one adapter.
    #[must_use]
    pub fn with_adapter_timeout(mut self, adapter_id: impl Into<String>, timeout: Duration) -> Self {
        self.adapter_timeouts.insert(adapter_id.into(), timeout);
        self
    }

    /// Budget for calls to `adapter_id`.
    pub fn timeout_for(&self, adapter_id: &str) -> Duration {
        self.adapter_timeouts
            .get(adapter_id)
            .copied()
            .unwrap_or(self.default_fetch_timeout)
    }
}

fn parse_timeouts(raw: &str) -> HashMap<String, Duration> {
    raw.split(',')
        .filter_map(|pair| {
            let (id, ms) = pair.split_once('=')?;
            let id = id.trim();
            let ms = ms.trim().parse::<u64>().ok()?;
            (!id.is_empty()).then(|| (id.to_string(), Duration::from_millis(ms)))
        })
        .collect()
}

/// Which streaming bindings a subscription listens to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamSelection {
    /// Only the first streaming binding in list order.
    #[default]
    First,
    /// Every streaming binding, merged.
    All,
}

/// What to do with triggers that arrive while a render is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Collapse them into one follow-up render.
    #[default]
    Coalesce,
    /// Render once per trigger, in order.
    Queue,
}

/// Error for unrecognized enum names in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for StreamSelection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "all" => Ok(Self::All),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coalesce" => Ok(Self::Coalesce),
            "queue" => Ok(Self::Queue),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Live re-render behavior.
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    pub selection: StreamSelection,
    pub overlap: OverlapPolicy,
    /// Rendered options buffered for a slow consumer.
    pub channel_capacity: usize,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            selection: StreamSelection::First,
            overlap: OverlapPolicy::Coalesce,
            channel_capacity: 16,
        }
    }
}

impl SubscriptionConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AC_STREAM_SELECTION`: `first` or `all` (default: first)
    /// - `AC_OVERLAP_POLICY`: `coalesce` or `queue` (default: coalesce)
    /// - `AC_SUBSCRIPTION_BUFFER`: downstream buffer size (default: 16, min 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            selection: env::var("AC_STREAM_SELECTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.selection),

            overlap: env::var("AC_OVERLAP_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.overlap),

            channel_capacity: env::var("AC_SUBSCRIPTION_BUFFER")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|n| n.max(1))
                .unwrap_or(defaults.channel_capacity),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub render: RenderConfig,
    pub subscription: SubscriptionConfig,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            render: RenderConfig::from_env(),
            subscription: SubscriptionConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.render.default_fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.subscription.selection, StreamSelection::First);
        assert_eq!(config.subscription.overlap, OverlapPolicy::Coalesce);
    }

    #[test]
    fn test_timeout_override() {
        let config = RenderConfig::default().with_adapter_timeout("rest", Duration::from_secs(2));
        assert_eq!(config.timeout_for("rest"), Duration::from_secs(2));
        assert_eq!(config.timeout_for("fixture"), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_timeouts() {
        let parsed = parse_timeouts("rest=5000, database = 15000,bad,=1,x=y");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["rest"], Duration::from_millis(5000));
        assert_eq!(parsed["database"], Duration::from_millis(15000));
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("Queue".parse::<OverlapPolicy>(), Ok(OverlapPolicy::Queue));
        assert_eq!(" all ".parse::<StreamSelection>(), Ok(StreamSelection::All));
        assert!("sometimes".parse::<OverlapPolicy>().is_err());
    }
}
