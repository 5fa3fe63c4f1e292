//! Configuration schema definitions

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote node configuration
    #[serde(default)]
    pub node: NodeConfig,
    /// Fee bounding configuration
    #[serde(default)]
    pub fees: FeeConfig,
    /// Confirmation polling configuration
    #[serde(default)]
    pub polling: PollingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node address: empty for the local node, `host[:port]`, or a full URL
    #[serde(default)]
    pub url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Fee bounding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Floor applied to network estimates, decimal string
    #[serde(default = "default_min_fee")]
    pub min_fee: String,
    /// Ceiling above which estimates are rejected, decimal string
    #[serde(default = "default_max_fee")]
    pub max_fee: String,
    /// Whether requested amounts already include the fee
    #[serde(default)]
    pub include_fee: bool,
}

/// Confirmation polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Interval between lookups in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Give up waiting after this many seconds (unbounded when absent)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Fee bounds parsed into integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFees {
    pub min_fee: U256,
    pub max_fee: U256,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("weave-transactor/{}", env!("CARGO_PKG_VERSION"))
}

fn default_min_fee() -> String {
    "0".to_string()
}

fn default_max_fee() -> String {
    "1000000000000".to_string() // 1 AR in winston
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl FeeConfig {
    /// Convert the decimal fee bounds to integers
    pub fn parse(&self) -> Result<ParsedFees, String> {
        let min_fee = types::amount::parse_decimal(&self.min_fee)
            .map_err(|e| format!("Invalid min_fee: {}", e))?;

        let max_fee = types::amount::parse_decimal(&self.max_fee)
            .map_err(|e| format!("Invalid max_fee: {}", e))?;

        Ok(ParsedFees { min_fee, max_fee })
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            min_fee: default_min_fee(),
            max_fee: default_max_fee(),
            include_fee: false,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_seconds: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fee_bounds() {
        let fees = FeeConfig {
            min_fee: "10".to_string(),
            max_fee: "100".to_string(),
            include_fee: true,
        };
        let parsed = fees.parse().unwrap();
        assert_eq!(parsed.min_fee, U256::from(10u64));
        assert_eq!(parsed.max_fee, U256::from(100u64));
    }

    #[test]
    fn test_parse_fee_bounds_rejects_garbage() {
        let fees = FeeConfig {
            min_fee: "ten".to_string(),
            ..FeeConfig::default()
        };
        assert!(fees.parse().unwrap_err().contains("min_fee"));
    }
}
