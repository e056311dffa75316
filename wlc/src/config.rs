//! WLC module configuration.

use nfa_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// WLC module configuration
///
/// Loaded from the environment with [`WlcConfig::from_env`] or from a JSON
/// document with [`WlcConfig::from_json`]. Missing JSON fields take their
/// default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WlcConfig {
    /// Capacity of the WLC request queue
    pub queue_capacity: usize,
    /// Notify `StartResult(Failed)` when another module's state refuses Start
    pub report_start_failures: bool,
    /// How long shutdown waits for the queue to drain
    #[serde(rename = "shutdown_timeout_ms", with = "millis")]
    pub shutdown_timeout: Duration,
}

impl Default for WlcConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            report_start_failures: false,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl WlcConfig {
    /// Load configuration from environment variables
    ///
    /// - `NFA_WLC_QUEUE_CAPACITY` (default 64)
    /// - `NFA_WLC_REPORT_START_FAILURES` (default false)
    /// - `NFA_WLC_SHUTDOWN_TIMEOUT_MS` (default 5000)
    ///
    /// Unparsable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            queue_capacity: env::var("NFA_WLC_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.queue_capacity),
            report_start_failures: env::var("NFA_WLC_REPORT_START_FAILURES")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.report_start_failures),
            shutdown_timeout: env::var("NFA_WLC_SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.shutdown_timeout, Duration::from_millis),
        }
    }

    /// Parse a JSON configuration document
    ///
    /// ```json
    /// { "queue_capacity": 16, "report_start_failures": true, "shutdown_timeout_ms": 500 }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Store configuration for the WLC worker
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_queue_capacity(self.queue_capacity)
            .with_shutdown_timeout(self.shutdown_timeout)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)] // u64 milliseconds cover ~584 million years
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    #[test]
    fn store_config_carries_queue_and_timeout() {
        let config = WlcConfig {
            queue_capacity: 3,
            report_start_failures: true,
            shutdown_timeout: Duration::from_millis(250),
        };

        let store = config.store_config();
        assert_eq!(store.queue_capacity, 3);
        assert_eq!(store.default_shutdown_timeout, Duration::from_millis(250));
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn json_document_round_trips() {
        let config = WlcConfig {
            queue_capacity: 16,
            report_start_failures: true,
            shutdown_timeout: Duration::from_millis(500),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"shutdown_timeout_ms\":500"));
        assert_eq!(WlcConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let config = WlcConfig::from_json(r#"{ "report_start_failures": true }"#).unwrap();

        assert!(config.report_start_failures);
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn mistyped_json_field_is_an_error() {
        assert!(WlcConfig::from_json(r#"{ "queue_capacity": "many" }"#).is_err());
    }
}
