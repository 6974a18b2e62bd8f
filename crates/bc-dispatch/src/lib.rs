//! Beacon alert dispatch engine
//!
//! This crate provides the core emergency-alert dispatch functionality with:
//! - PlanRegistry: category -> (template, ordered recipients), built once from config
//! - AlertDispatcher: sequential, rate-limited fan-out with per-recipient fault isolation
//! - Throttle: injectable pacing between consecutive sends within one dispatch
//! - TransportClient / HttpSmsGateway: one-message-to-one-address delivery
//! - SendAuthorization: caller-side transport permission probe
//! - API: HTTP invocation boundary, health probes, and Prometheus metrics

pub mod aggregate;
pub mod api;
pub mod authorize;
pub mod dispatch_metrics;
pub mod dispatcher;
pub mod error;
pub mod plan;
pub mod throttle;
pub mod transport;

pub use aggregate::aggregate;
pub use authorize::{SendAuthorization, StaticAuthorization};
pub use dispatcher::AlertDispatcher;
pub use error::DispatchError;
pub use plan::{DispatchPlan, MessageTemplate, PlanRegistry};
pub use throttle::{IntervalThrottle, NoopThrottle, Throttle, ThrottleSession};
pub use transport::{HttpSmsGateway, TransportClient};

pub type Result<T> = std::result::Result<T, DispatchError>;
