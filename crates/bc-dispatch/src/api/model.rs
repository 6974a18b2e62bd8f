//! API request/response models

use bc_common::{AlertCategory, AlertPayload, WeatherReading};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Bridge-style dispatch request: a method name selecting the alert
/// category plus the alert payload fields. Absent fields take the same
/// defaults the original bridge applied.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// "sendEmergencySMS" or "triggerWeatherEmergency"
    pub method: String,
    #[serde(default)]
    pub location: String,
    /// Free-text message (standard alerts)
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub priority: bool,
    /// Weather condition (weather-emergency alerts)
    #[serde(default)]
    pub weather_condition: String,
    /// Temperature in °C (weather-emergency alerts)
    #[serde(default)]
    pub temperature_celsius: f64,
}

impl DispatchRequest {
    /// Convert bridge arguments into the engine payload. Weather metrics
    /// only travel with weather-emergency dispatches.
    pub fn into_payload(self, category: AlertCategory) -> AlertPayload {
        let weather = match category {
            AlertCategory::WeatherEmergency => Some(WeatherReading {
                condition: self.weather_condition,
                temperature_celsius: self.temperature_celsius,
            }),
            AlertCategory::Standard => None,
        };

        AlertPayload {
            location: self.location,
            message: (!self.message.is_empty()).then_some(self.message),
            priority: self.priority,
            weather,
        }
    }
}

/// Caller-facing dispatch summary
#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchResponse {
    /// Recipients the gateway accepted a send for
    pub sent: u32,
    /// Recipients whose send failed
    pub failed: u32,
    /// Single human-readable status line
    pub message: String,
}

/// Structured API error
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable code: PERMISSION_DENIED, CONFIGURATION_ERROR,
    /// ALL_DELIVERIES_FAILED, NOT_IMPLEMENTED
    pub code: String,
    pub message: String,
}
