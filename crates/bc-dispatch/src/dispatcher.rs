//! AlertDispatcher - sequential, paced fan-out over a dispatch plan.

use std::sync::Arc;
use std::time::Instant;

use bc_common::{AlertCategory, AlertPayload, DeliveryOutcome, DispatchResult};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::dispatch_metrics;
use crate::error::DispatchError;
use crate::plan::PlanRegistry;
use crate::throttle::Throttle;
use crate::transport::TransportClient;

/// Orchestrates one alert broadcast: resolve the plan, compose the message
/// once, contact every recipient in plan order, reduce the outcomes.
pub struct AlertDispatcher {
    plans: PlanRegistry,
    transport: Arc<dyn TransportClient>,
    throttle: Arc<dyn Throttle>,
}

impl AlertDispatcher {
    pub fn new(
        plans: PlanRegistry,
        transport: Arc<dyn TransportClient>,
        throttle: Arc<dyn Throttle>,
    ) -> Self {
        Self {
            plans,
            transport,
            throttle,
        }
    }

    /// Dispatch one alert to every recipient in the category's plan.
    ///
    /// Precondition: the caller has confirmed transport authorization. The
    /// dispatcher does not re-check it.
    ///
    /// Every configured recipient is attempted regardless of individual
    /// outcomes; a transport failure is recorded as a failed outcome for
    /// that recipient and never aborts the remaining sends. The only
    /// call-level error is an unconfigured category, raised before any
    /// send is attempted.
    pub async fn dispatch(
        &self,
        category: AlertCategory,
        payload: &AlertPayload,
    ) -> Result<DispatchResult, DispatchError> {
        let plan = self.plans.resolve(category)?;
        let dispatch_id = Uuid::new_v4();
        let message = plan.compose(payload);
        let started = Instant::now();

        info!(
            dispatch_id = %dispatch_id,
            category = %category,
            recipients = plan.recipients.len(),
            "Dispatching alert"
        );

        let session = self.throttle.session();
        let mut outcomes = Vec::with_capacity(plan.recipients.len());

        for recipient in plan.recipients {
            // The first permit is free; later permits pace the sends.
            session.acquire().await;

            match self.transport.send(&recipient.address, &message.body).await {
                Ok(()) => {
                    debug!(
                        dispatch_id = %dispatch_id,
                        address = %recipient.address,
                        role = %recipient.role,
                        "Delivery accepted"
                    );
                    dispatch_metrics::record_delivery(category, "sent");
                    outcomes.push(DeliveryOutcome::Sent);
                }
                Err(failure) => {
                    warn!(
                        dispatch_id = %dispatch_id,
                        address = %recipient.address,
                        role = %recipient.role,
                        error = %failure,
                        "Delivery failed"
                    );
                    dispatch_metrics::record_delivery(category, "failed");
                    outcomes.push(DeliveryOutcome::Failed(failure));
                }
            }
        }

        let result = aggregate(&outcomes);
        dispatch_metrics::record_alert_dispatched(category, result.overall_success);
        dispatch_metrics::record_dispatch_duration(category, started.elapsed());

        info!(
            dispatch_id = %dispatch_id,
            category = %category,
            sent = result.sent_count,
            failed = result.failed_count,
            overall_success = result.overall_success,
            "Dispatch complete"
        );

        Ok(result)
    }
}
