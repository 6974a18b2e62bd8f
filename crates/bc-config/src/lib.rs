//! Beacon configuration.
//!
//! TOML-based configuration with environment variable overrides. Dispatch
//! plans (category -> ordered recipient list) are configuration data loaded
//! once at startup, not code.

use bc_common::{AlertCategory, Recipient};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub transport: TransportConfig,
    pub dispatch: DispatchConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// SMS gateway transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Gateway endpoint the transport posts sends to. Empty means the
    /// process is not authorized to use the transport.
    pub gateway_url: String,
    /// Bearer token for the gateway (optional)
    pub auth_token: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            gateway_url: String::new(),
            auth_token: String::new(),
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
        }
    }
}

/// Dispatch engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Minimum interval between consecutive sends within one dispatch,
    /// in milliseconds. Zero disables pacing.
    pub send_interval_ms: u64,
    /// One plan per alert category
    pub plans: Vec<PlanConfig>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            send_interval_ms: 100,
            plans: vec![
                PlanConfig {
                    category: AlertCategory::Standard,
                    recipients: vec![
                        recipient("112", "emergency-services"),
                        recipient("+919876543210", "family"),
                        recipient("+919876543211", "friend"),
                        recipient("+911234567890", "secondary-contact"),
                    ],
                },
                PlanConfig {
                    category: AlertCategory::WeatherEmergency,
                    recipients: vec![
                        recipient("112", "emergency-services"),
                        recipient("1070", "weather-helpline"),
                    ],
                },
            ],
        }
    }
}

fn recipient(address: &str, role: &str) -> Recipient {
    Recipient {
        address: address.to_string(),
        role: role.to_string(),
    }
}

/// Recipient set for one alert category. Order is delivery order; keep
/// emergency services first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub category: AlertCategory,
    pub recipients: Vec<Recipient>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        let loader = ConfigLoader::new();
        loader.load()
    }

    /// Validate plan data before the registry is built from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for plan in &self.dispatch.plans {
            if !seen.insert(plan.category) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate dispatch plan for category {}",
                    plan.category
                )));
            }
            if plan.recipients.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "dispatch plan for category {} has no recipients",
                    plan.category
                )));
            }
            if let Some(r) = plan.recipients.iter().find(|r| r.address.is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "recipient with role {:?} in category {} has an empty address",
                    r.role, plan.category
                )));
            }
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Beacon Configuration
# Environment variables override these settings

[http]
port = 8080
host = "0.0.0.0"

[transport]
gateway_url = ""       # SMS gateway endpoint; empty disables sending
auth_token = ""        # bearer token for the gateway
timeout_ms = 10000
connect_timeout_ms = 5000

[dispatch]
send_interval_ms = 100

# Recipient order is delivery order; emergency services go first.
[[dispatch.plans]]
category = "standard"
recipients = [
    { address = "112", role = "emergency-services" },
    { address = "+919876543210", role = "family" },
    { address = "+919876543211", role = "friend" },
    { address = "+911234567890", role = "secondary-contact" },
]

[[dispatch.plans]]
category = "weather-emergency"
recipients = [
    { address = "112", role = "emergency-services" },
    { address = "1070", role = "weather-helpline" },
]
"#
        .to_string()
    }
}
