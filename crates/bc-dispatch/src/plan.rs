//! Dispatch plans - category to template and recipient resolution.
//!
//! The registry is built once from configuration at startup and is
//! read-only afterwards. Resolution is pure and deterministic; recipient
//! order is delivery order.

use std::collections::HashMap;

use bc_common::{AlertCategory, AlertPayload, ComposedMessage, Recipient};
use bc_config::DispatchConfig;
use chrono::{DateTime, Utc};

use crate::error::DispatchError;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Category-specific rendering of an alert payload into message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTemplate {
    Standard,
    Weather,
}

impl MessageTemplate {
    pub fn for_category(category: AlertCategory) -> Self {
        match category {
            AlertCategory::Standard => MessageTemplate::Standard,
            AlertCategory::WeatherEmergency => MessageTemplate::Weather,
        }
    }

    /// Render the payload at the given instant. Pure: same payload and
    /// instant, same text.
    pub fn render(&self, payload: &AlertPayload, at: DateTime<Utc>) -> String {
        let timestamp = at.format(TIMESTAMP_FORMAT);
        match self {
            MessageTemplate::Standard => {
                let mut lines = Vec::new();
                if payload.priority {
                    lines.push("PRIORITY EMERGENCY ALERT!".to_string());
                }
                if let Some(message) = payload.message.as_deref() {
                    if !message.is_empty() {
                        lines.push(message.to_string());
                    }
                }
                lines.push(format!("Location: {}", payload.location));
                lines.push(format!("Time: {}", timestamp));
                lines.join("\n")
            }
            MessageTemplate::Weather => {
                let weather = payload.weather.clone().unwrap_or_default();
                format!(
                    "WEATHER EMERGENCY ALERT!\n\
                     Severe weather conditions detected.\n\
                     Condition: {}\n\
                     Temperature: {}°C\n\
                     Location: {}\n\
                     Immediate assistance required!\n\
                     Time: {}",
                    weather.condition, weather.temperature_celsius, payload.location, timestamp
                )
            }
        }
    }
}

/// Process-wide mapping from alert category to dispatch plan.
pub struct PlanRegistry {
    plans: HashMap<AlertCategory, Vec<Recipient>>,
}

impl PlanRegistry {
    /// Build the registry from validated configuration.
    pub fn from_config(config: &DispatchConfig) -> Self {
        let plans = config
            .plans
            .iter()
            .map(|plan| (plan.category, plan.recipients.clone()))
            .collect();
        Self { plans }
    }

    /// Resolve the template and ordered recipient list for a category.
    pub fn resolve(&self, category: AlertCategory) -> Result<DispatchPlan<'_>, DispatchError> {
        let recipients = self
            .plans
            .get(&category)
            .ok_or(DispatchError::UnknownCategory(category))?;
        Ok(DispatchPlan {
            category,
            template: MessageTemplate::for_category(category),
            recipients,
        })
    }
}

/// The resolved plan for one dispatch: a template plus the recipients to
/// contact, in delivery order.
pub struct DispatchPlan<'a> {
    pub category: AlertCategory,
    pub template: MessageTemplate,
    pub recipients: &'a [Recipient],
}

impl DispatchPlan<'_> {
    /// Render the payload once. The timestamp is captured here so every
    /// recipient receives an identical body.
    pub fn compose(&self, payload: &AlertPayload) -> ComposedMessage {
        let composed_at = Utc::now();
        ComposedMessage {
            body: self.template.render(payload, composed_at),
            composed_at,
        }
    }
}
