//! Beacon Alert Server
//!
//! Serves the alert dispatch API: one POST broadcasts a time-critical
//! message to the configured recipients over the SMS gateway transport and
//! reports a delivery tally back to the caller.
//!
//! Configuration comes from a TOML file (see `AppConfig::example_toml()`)
//! with `BEACON_*` environment variable overrides. Without a configured
//! gateway URL the server starts, but rejects dispatch requests with
//! PERMISSION_DENIED until a gateway is provisioned.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use bc_config::AppConfig;
use bc_dispatch::api::{create_router, AppState};
use bc_dispatch::{
    AlertDispatcher, HttpSmsGateway, IntervalThrottle, PlanRegistry, StaticAuthorization,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for local development)
    let _ = dotenvy::dotenv();

    bc_common::logging::init_logging("bc-server");

    info!("Starting Beacon Alert Server");

    // 1. Load and validate configuration
    let config = AppConfig::load()?;
    config.validate()?;

    // 2. Build the dispatch plan registry (read-only after this point)
    let plans = PlanRegistry::from_config(&config.dispatch);
    info!(
        plans = config.dispatch.plans.len(),
        send_interval_ms = config.dispatch.send_interval_ms,
        "Loaded dispatch plans"
    );

    // 3. Transport authorization: granted iff a gateway is configured
    let authorized = !config.transport.gateway_url.is_empty();
    if !authorized {
        warn!("No SMS gateway configured; dispatch requests will be rejected with PERMISSION_DENIED");
    }
    let authorization = Arc::new(StaticAuthorization::new(authorized));

    // 4. Transport and pacing
    let transport = Arc::new(HttpSmsGateway::new(&config.transport));
    let throttle = Arc::new(IntervalThrottle::new(Duration::from_millis(
        config.dispatch.send_interval_ms,
    )));

    let dispatcher = Arc::new(AlertDispatcher::new(plans, transport, throttle));

    // 5. Metrics recorder
    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    let state = AppState {
        dispatcher,
        authorization,
        metrics: Some(metrics_handle),
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.http.host, config.http.port);
    info!(addr = %addr, "Beacon Alert Server listening");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Beacon Alert Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
