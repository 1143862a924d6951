//! Navigation boundary.

use serde::{Deserialize, Serialize};

/// Places the client can be sent to outside the chat UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Login,
    Logout,
}

/// Leaves the chat UI. After navigation the session is considered discarded.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}
