//! Transport authorization probe.
//!
//! Authorization is a caller precondition, not a dispatcher concern: the
//! invocation boundary checks it immediately before calling the engine, and
//! the engine itself never re-checks.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

/// Reports whether this process may use the message transport.
pub trait SendAuthorization: Send + Sync {
    fn is_authorized(&self) -> bool;

    /// Fire-and-forget request for authorization. The grant, if it
    /// arrives, is observed through `is_authorized` on a later call.
    fn request_authorization(&self);
}

/// Flag-backed authorization. The flag flips when a grant arrives through
/// an external channel (operator action, credential provisioning).
pub struct StaticAuthorization {
    granted: AtomicBool,
}

impl StaticAuthorization {
    pub fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }

    pub fn granted() -> Self {
        Self::new(true)
    }

    pub fn denied() -> Self {
        Self::new(false)
    }

    pub fn grant(&self) {
        self.granted.store(true, Ordering::SeqCst);
    }

    pub fn revoke(&self) {
        self.granted.store(false, Ordering::SeqCst);
    }
}

impl SendAuthorization for StaticAuthorization {
    fn is_authorized(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn request_authorization(&self) {
        info!("Transport authorization requested; configure an SMS gateway to grant it");
    }
}
