use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod logging;

// ============================================================================
// Alert Types
// ============================================================================

/// Class of emergency situation. Selects the dispatch plan (recipient set
/// and message template) for one dispatch invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCategory {
    Standard,
    WeatherEmergency,
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertCategory::Standard => write!(f, "standard"),
            AlertCategory::WeatherEmergency => write!(f, "weather-emergency"),
        }
    }
}

/// Caller-supplied alert content. Never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub location: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub priority: bool,
    /// Weather metrics, present for weather-emergency dispatches.
    #[serde(default)]
    pub weather: Option<WeatherReading>,
}

/// Structured weather metrics carried by weather-emergency alerts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    pub condition: String,
    pub temperature_celsius: f64,
}

/// An addressable destination for an alert, with a logical role tag
/// (e.g. "emergency-services", "family", "weather-helpline").
///
/// Recipient lists are configuration data; their order is delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recipient {
    pub address: String,
    pub role: String,
}

/// The payload rendered through a category template. Composed exactly once
/// per dispatch so every recipient receives an identical body.
#[derive(Debug, Clone)]
pub struct ComposedMessage {
    pub body: String,
    pub composed_at: DateTime<Utc>,
}

// ============================================================================
// Outcome Types
// ============================================================================

/// Per-recipient failure reason, classified by the transport.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("gateway rejected send (HTTP {status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("transport error: {0}")]
    Other(String),
}

/// Result of one delivery attempt. Recorded exactly once per recipient in
/// the plan, immutable afterwards.
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    Sent,
    Failed(TransportFailure),
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }
}

/// Machine-readable code attached to a dispatch result on total failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchErrorCode {
    AllDeliveriesFailed,
}

/// Aggregate result of one dispatch invocation.
///
/// `sent_count + failed_count` always equals the number of recipients
/// attempted. Partial delivery counts as overall success: for emergency
/// alerting, reaching anyone at all is the outcome that matters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub sent_count: u32,
    pub failed_count: u32,
    pub overall_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<DispatchErrorCode>,
}

impl DispatchResult {
    pub fn attempted(&self) -> u32 {
        self.sent_count + self.failed_count
    }
}
