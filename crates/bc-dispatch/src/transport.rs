//! Transport - SMS gateway delivery
//!
//! One message to one address. Failures are classified per recipient and
//! never abort the surrounding dispatch. No retries: the dispatcher treats
//! every send as single-shot.

use std::time::Duration;

use async_trait::async_trait;
use bc_common::TransportFailure;
use bc_config::TransportConfig;
use serde::Serialize;
use tracing::{debug, warn};

/// Sends one message body to one address.
#[async_trait]
pub trait TransportClient: Send + Sync {
    async fn send(&self, address: &str, body: &str) -> Result<(), TransportFailure>;
}

/// Payload posted to the SMS gateway
#[derive(Debug, Serialize)]
struct GatewaySendRequest<'a> {
    to: &'a str,
    body: &'a str,
}

/// HTTP-based SMS gateway transport
pub struct HttpSmsGateway {
    client: reqwest::Client,
    gateway_url: String,
    auth_token: Option<String>,
}

impl HttpSmsGateway {
    pub fn new(config: &TransportConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            gateway_url: config.gateway_url.clone(),
            auth_token: (!config.auth_token.is_empty()).then(|| config.auth_token.clone()),
        }
    }
}

#[async_trait]
impl TransportClient for HttpSmsGateway {
    async fn send(&self, address: &str, body: &str) -> Result<(), TransportFailure> {
        let mut request = self
            .client
            .post(&self.gateway_url)
            .json(&GatewaySendRequest { to: address, body });

        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    debug!(
                        address = %address,
                        status_code = status.as_u16(),
                        "Gateway accepted send"
                    );
                    Ok(())
                } else {
                    let reason = response.text().await.unwrap_or_default();
                    warn!(
                        address = %address,
                        status_code = status.as_u16(),
                        "Gateway rejected send"
                    );
                    Err(TransportFailure::Rejected {
                        status: status.as_u16(),
                        reason,
                    })
                }
            }
            Err(e) if e.is_timeout() => {
                warn!(address = %address, error = %e, "Gateway request timeout");
                Err(TransportFailure::Timeout)
            }
            Err(e) if e.is_connect() => {
                warn!(address = %address, error = %e, "Gateway connection error");
                Err(TransportFailure::Connection(e.to_string()))
            }
            Err(e) => {
                warn!(address = %address, error = %e, "Gateway request failed");
                Err(TransportFailure::Other(e.to_string()))
            }
        }
    }
}
