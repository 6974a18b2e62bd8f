use bc_common::AlertCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// No plan configured for the category. Defensive; reachable when a
    /// deployment's config omits a plan.
    #[error("No dispatch plan configured for category {0}")]
    UnknownCategory(AlertCategory),

    /// The caller invoked the engine without confirming transport
    /// authorization first.
    #[error("Transport authorization missing")]
    PermissionDenied,
}
