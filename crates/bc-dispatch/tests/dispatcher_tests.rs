//! AlertDispatcher Tests
//!
//! Tests for:
//! - Per-recipient fault isolation (no early abort)
//! - Plan-order delivery
//! - One composed body per dispatch
//! - Aggregate result invariants
//! - Unknown category fail-fast

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use bc_common::{
    AlertCategory, AlertPayload, DispatchErrorCode, TransportFailure, WeatherReading,
};
use bc_config::DispatchConfig;
use bc_dispatch::{AlertDispatcher, DispatchError, NoopThrottle, PlanRegistry, TransportClient};

/// Transport fake that records every send and fails scripted addresses
struct RecordingTransport {
    calls: Mutex<Vec<(String, String)>>,
    fail_all: bool,
    failing: HashSet<String>,
}

impl RecordingTransport {
    fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_all: false,
            failing: HashSet::new(),
        }
    }

    fn failing_all() -> Self {
        Self {
            fail_all: true,
            ..Self::succeeding()
        }
    }

    fn failing_for(addresses: &[&str]) -> Self {
        Self {
            failing: addresses.iter().map(|a| a.to_string()).collect(),
            ..Self::succeeding()
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TransportClient for RecordingTransport {
    async fn send(&self, address: &str, body: &str) -> Result<(), TransportFailure> {
        self.calls.lock().push((address.to_string(), body.to_string()));
        if self.fail_all || self.failing.contains(address) {
            Err(TransportFailure::Connection("radio unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn dispatcher_with(transport: Arc<RecordingTransport>) -> AlertDispatcher {
    let plans = PlanRegistry::from_config(&DispatchConfig::default());
    AlertDispatcher::new(plans, transport, Arc::new(NoopThrottle))
}

fn standard_payload() -> AlertPayload {
    AlertPayload {
        location: "12.9716,77.5946".to_string(),
        message: Some("Need help immediately".to_string()),
        priority: false,
        weather: None,
    }
}

fn weather_payload() -> AlertPayload {
    AlertPayload {
        location: "Shimla".to_string(),
        message: None,
        priority: true,
        weather: Some(WeatherReading {
            condition: "hailstorm".to_string(),
            temperature_celsius: -5.0,
        }),
    }
}

#[tokio::test]
async fn all_recipients_succeed() {
    let transport = Arc::new(RecordingTransport::succeeding());
    let dispatcher = dispatcher_with(transport.clone());

    let result = dispatcher
        .dispatch(AlertCategory::Standard, &standard_payload())
        .await
        .unwrap();

    assert_eq!(result.sent_count, 4);
    assert_eq!(result.failed_count, 0);
    assert!(result.overall_success);
    assert!(result.error_code.is_none());
    assert_eq!(transport.calls().len(), 4);
}

#[tokio::test]
async fn every_send_failing_reports_error_code() {
    let transport = Arc::new(RecordingTransport::failing_all());
    let dispatcher = dispatcher_with(transport.clone());

    let result = dispatcher
        .dispatch(AlertCategory::Standard, &standard_payload())
        .await
        .unwrap();

    assert_eq!(result.sent_count, 0);
    assert_eq!(result.failed_count, 4);
    assert!(!result.overall_success);
    assert_eq!(result.error_code, Some(DispatchErrorCode::AllDeliveriesFailed));
    // Every recipient was still attempted
    assert_eq!(transport.calls().len(), 4);
}

#[tokio::test]
async fn mid_batch_failures_do_not_abort_remaining_sends() {
    // 2nd and 3rd recipients of the standard plan fail
    let transport = Arc::new(RecordingTransport::failing_for(&[
        "+919876543210",
        "+919876543211",
    ]));
    let dispatcher = dispatcher_with(transport.clone());

    let result = dispatcher
        .dispatch(AlertCategory::Standard, &standard_payload())
        .await
        .unwrap();

    assert_eq!(transport.calls().len(), 4, "the 4th recipient must still be attempted");
    assert_eq!(result.sent_count, 2);
    assert_eq!(result.failed_count, 2);
    assert!(result.overall_success, "partial delivery is still success");
}

#[tokio::test]
async fn recipients_are_contacted_in_plan_order() {
    let transport = Arc::new(RecordingTransport::succeeding());
    let dispatcher = dispatcher_with(transport.clone());

    dispatcher
        .dispatch(AlertCategory::Standard, &standard_payload())
        .await
        .unwrap();

    let addresses: Vec<String> = transport.calls().into_iter().map(|(a, _)| a).collect();
    assert_eq!(
        addresses,
        vec!["112", "+919876543210", "+919876543211", "+911234567890"]
    );
}

#[tokio::test]
async fn every_recipient_receives_the_identical_body() {
    let transport = Arc::new(RecordingTransport::succeeding());
    let dispatcher = dispatcher_with(transport.clone());

    dispatcher
        .dispatch(AlertCategory::Standard, &standard_payload())
        .await
        .unwrap();

    let bodies: Vec<String> = transport.calls().into_iter().map(|(_, b)| b).collect();
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(bodies[0].contains("Location: 12.9716,77.5946"));
    assert!(bodies[0].contains("Need help immediately"));
}

#[tokio::test]
async fn weather_dispatch_targets_the_priority_plan() {
    let transport = Arc::new(RecordingTransport::succeeding());
    let dispatcher = dispatcher_with(transport.clone());

    let result = dispatcher
        .dispatch(AlertCategory::WeatherEmergency, &weather_payload())
        .await
        .unwrap();

    assert_eq!(result.sent_count, 2);
    let calls = transport.calls();
    let addresses: Vec<&str> = calls.iter().map(|(a, _)| a.as_str()).collect();
    assert_eq!(addresses, vec!["112", "1070"]);

    let body = &calls[0].1;
    assert!(body.contains("Condition: hailstorm"));
    assert!(body.contains("Temperature: -5°C"));
    assert!(body.contains("Location: Shimla"));
}

#[tokio::test]
async fn unconfigured_category_aborts_before_any_send() {
    let mut config = DispatchConfig::default();
    config
        .plans
        .retain(|plan| plan.category == AlertCategory::Standard);

    let transport = Arc::new(RecordingTransport::succeeding());
    let dispatcher = AlertDispatcher::new(
        PlanRegistry::from_config(&config),
        transport.clone(),
        Arc::new(NoopThrottle),
    );

    let err = dispatcher
        .dispatch(AlertCategory::WeatherEmergency, &weather_payload())
        .await
        .err()
        .unwrap();

    assert!(matches!(err, DispatchError::UnknownCategory(_)));
    assert_eq!(transport.calls().len(), 0, "fail fast means zero sends");
}

#[tokio::test]
async fn priority_flag_marks_the_composed_message() {
    let transport = Arc::new(RecordingTransport::succeeding());
    let dispatcher = dispatcher_with(transport.clone());

    let mut payload = standard_payload();
    payload.priority = true;

    dispatcher
        .dispatch(AlertCategory::Standard, &payload)
        .await
        .unwrap();

    let body = &transport.calls()[0].1;
    assert!(body.starts_with("PRIORITY EMERGENCY ALERT!"));
}
