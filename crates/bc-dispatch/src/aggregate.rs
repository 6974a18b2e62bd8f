//! Outcome reduction.

use bc_common::{DeliveryOutcome, DispatchErrorCode, DispatchResult};

/// Reduce per-recipient outcomes into the caller-facing summary.
///
/// At-least-one-delivery policy: partial delivery still counts as overall
/// success, so the caller never mistakes a partly delivered alert for one
/// that reached nobody. A batch with no successful send carries
/// `AllDeliveriesFailed`.
pub fn aggregate(outcomes: &[DeliveryOutcome]) -> DispatchResult {
    let sent_count = outcomes.iter().filter(|o| o.is_sent()).count() as u32;
    let failed_count = outcomes.len() as u32 - sent_count;
    let overall_success = sent_count > 0;

    DispatchResult {
        sent_count,
        failed_count,
        overall_success,
        error_code: (!overall_success).then_some(DispatchErrorCode::AllDeliveriesFailed),
    }
}
