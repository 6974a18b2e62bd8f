//! Metrics instrumentation for the dispatch engine
//!
//! Prometheus-compatible metrics for:
//! - Dispatch counts and outcomes
//! - Per-recipient delivery outcomes
//! - Dispatch latency

use bc_common::AlertCategory;
use metrics::{counter, histogram};
use std::time::Duration;

/// Record a completed dispatch
pub fn record_alert_dispatched(category: AlertCategory, success: bool) {
    counter!(
        "bc_alerts_dispatched_total",
        "category" => category.to_string(),
        "success" => success.to_string()
    )
    .increment(1);
}

/// Record one per-recipient delivery outcome
pub fn record_delivery(category: AlertCategory, outcome: &str) {
    counter!(
        "bc_deliveries_total",
        "category" => category.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record end-to-end dispatch latency
pub fn record_dispatch_duration(category: AlertCategory, duration: Duration) {
    histogram!(
        "bc_dispatch_duration_seconds",
        "category" => category.to_string()
    )
    .record(duration.as_secs_f64());
}
