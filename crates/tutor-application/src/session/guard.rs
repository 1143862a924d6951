//! Session expiry handling.

use super::messages::TITLE_AUTH;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tutor_core::interaction::{Destination, DialogPrimitives, Navigator};

/// Reacts to the first unauthorized answer of the session.
///
/// The user is notified and sent to the login boundary exactly once, however
/// many in-flight requests fail afterwards. Once expired, the session is
/// considered discarded and no further pushes are attempted.
pub struct SessionGuard {
    dialogs: Arc<dyn DialogPrimitives>,
    navigator: Arc<dyn Navigator>,
    expired: AtomicBool,
}

impl SessionGuard {
    pub fn new(dialogs: Arc<dyn DialogPrimitives>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            dialogs,
            navigator,
            expired: AtomicBool::new(false),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }

    /// Notifies with `message`, then navigates to the login boundary.
    pub async fn expire(&self, message: &str) {
        if self.expired.swap(true, Ordering::SeqCst) {
            tracing::debug!("[SessionGuard] Already expired, ignoring");
            return;
        }
        tracing::warn!("[SessionGuard] Session expired, redirecting to login");
        self.dialogs.notify(message, TITLE_AUTH).await;
        self.navigator.navigate(Destination::Login);
    }
}
