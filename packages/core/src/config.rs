use crate::{Multiplier, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables shared by every reporter in an app.
///
/// ```rust
/// use dimension_reporter_core::ReporterConfig;
///
/// let config = ReporterConfig::from_json(r#"{ "fetch_delay_ms": 250 }"#).unwrap();
/// assert_eq!(config.fetch_delay().as_millis(), 250);
/// assert_eq!(config.default_multiplier, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// How long a fetch takes to resolve after a resize, in milliseconds.
    pub fetch_delay_ms: u64,

    /// The multiplier used when a component does not specify one.
    pub default_multiplier: f64,
}

impl ReporterConfig {
    pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(1500);

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Multiplier::new(config.default_multiplier)?;
        Ok(config)
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Resolve a component's multiplier input against this config's default.
    pub fn multiplier(&self, prop: Option<f64>) -> Result<Multiplier> {
        Multiplier::new(prop.unwrap_or(self.default_multiplier))
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 1500,
            default_multiplier: Multiplier::ONE.get(),
        }
    }
}
