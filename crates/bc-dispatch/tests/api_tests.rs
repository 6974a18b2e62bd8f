//! HTTP API Tests
//!
//! Tests for:
//! - Authorization precondition (denied calls never reach the transport)
//! - Bridge method routing
//! - Success and error response shapes

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use bc_common::TransportFailure;
use bc_config::DispatchConfig;
use bc_dispatch::api::{create_router, AppState};
use bc_dispatch::{
    AlertDispatcher, NoopThrottle, PlanRegistry, SendAuthorization, StaticAuthorization,
    TransportClient,
};

/// Transport fake that counts sends and optionally fails them all
struct CountingTransport {
    calls: AtomicU32,
    fail_all: bool,
}

impl CountingTransport {
    fn succeeding() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_all: false,
        }
    }

    fn failing_all() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_all: true,
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportClient for CountingTransport {
    async fn send(&self, _address: &str, _body: &str) -> Result<(), TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            Err(TransportFailure::Timeout)
        } else {
            Ok(())
        }
    }
}

fn test_router(
    transport: Arc<CountingTransport>,
    authorization: Arc<dyn SendAuthorization>,
) -> Router {
    let plans = PlanRegistry::from_config(&DispatchConfig::default());
    let dispatcher = Arc::new(AlertDispatcher::new(
        plans,
        transport,
        Arc::new(NoopThrottle),
    ));
    create_router(AppState {
        dispatcher,
        authorization,
        metrics: None,
    })
}

async fn post_alert(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/alerts")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn denied_authorization_short_circuits_before_any_send() {
    let transport = Arc::new(CountingTransport::succeeding());
    let app = test_router(transport.clone(), Arc::new(StaticAuthorization::denied()));

    let (status, body) = post_alert(
        app,
        serde_json::json!({
            "method": "sendEmergencySMS",
            "location": "12.9716,77.5946",
            "message": "Need help immediately"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PERMISSION_DENIED");
    assert_eq!(transport.call_count(), 0, "no transport call may happen");
}

#[tokio::test]
async fn successful_dispatch_reports_the_tally() {
    let transport = Arc::new(CountingTransport::succeeding());
    let app = test_router(transport.clone(), Arc::new(StaticAuthorization::granted()));

    let (status, body) = post_alert(
        app,
        serde_json::json!({
            "method": "sendEmergencySMS",
            "location": "12.9716,77.5946",
            "message": "Need help immediately",
            "priority": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sent"], 4);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["message"], "Emergency alert sent to 4 of 4 recipients");
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn weather_method_routes_the_weather_plan() {
    let transport = Arc::new(CountingTransport::succeeding());
    let app = test_router(transport.clone(), Arc::new(StaticAuthorization::granted()));

    let (status, body) = post_alert(
        app,
        serde_json::json!({
            "method": "triggerWeatherEmergency",
            "location": "Shimla",
            "weatherCondition": "hailstorm",
            "temperatureCelsius": -5.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sent"], 2);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn unknown_method_is_not_implemented() {
    let transport = Arc::new(CountingTransport::succeeding());
    let app = test_router(transport.clone(), Arc::new(StaticAuthorization::granted()));

    let (status, body) = post_alert(
        app,
        serde_json::json!({ "method": "launchFireworks", "location": "here" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_IMPLEMENTED");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn total_failure_maps_to_bad_gateway() {
    let transport = Arc::new(CountingTransport::failing_all());
    let app = test_router(transport.clone(), Arc::new(StaticAuthorization::granted()));

    let (status, body) = post_alert(
        app,
        serde_json::json!({
            "method": "sendEmergencySMS",
            "location": "12.9716,77.5946"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "ALL_DELIVERIES_FAILED");
    // Every recipient was attempted before the aggregate verdict
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn health_endpoint_reports_up() {
    let transport = Arc::new(CountingTransport::succeeding());
    let app = test_router(transport, Arc::new(StaticAuthorization::granted()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "UP");
}
