//! Configuration model for the negotiation engine.

use serde::{Deserialize, Serialize};

use super::capability::Capability;
use super::rules::ApplicabilityRules;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Negotiation behavior.
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Behavior of a negotiation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NegotiationConfig {
    /// Ordered list for the sequential stage. The platform requires these to
    /// be requested one at a time, in this order.
    #[serde(default = "default_sequential_order")]
    pub sequential_order: Vec<Capability>,

    /// Version gates applied before any capability is requested.
    #[serde(default)]
    pub rules: ApplicabilityRules,
}

fn default_sequential_order() -> Vec<Capability> {
    vec![
        Capability::fine_location(),
        Capability::coarse_location(),
        Capability::post_notifications(),
        Capability::foreground_service(),
    ]
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            sequential_order: default_sequential_order(),
            rules: ApplicabilityRules::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// Structured JSON output.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sequential_order_matches_platform_requirements() {
        let config = NegotiationConfig::default();
        assert_eq!(
            config.sequential_order,
            vec![
                Capability::fine_location(),
                Capability::coarse_location(),
                Capability::post_notifications(),
                Capability::foreground_service(),
            ]
        );
    }

    #[test]
    fn logging_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
