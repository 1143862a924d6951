//! Chat store trait.

use crate::chat::ChatSnapshot;
use crate::error::Result;
use async_trait::async_trait;

/// Transport for the full chat snapshot.
///
/// Stateless with respect to the model: it loads once at startup and receives
/// the whole snapshot after every mutation.
///
/// # Errors
///
/// Implementations map an unauthorized answer to `TutorError::AuthExpired`
/// and every connection-level failure to `TutorError::Transport`.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Fetches the stored snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(snapshot))`: a snapshot was stored
    /// - `Ok(None)`: nothing stored yet for this user
    /// - `Err(_)`: authentication or transport failure
    async fn load(&self) -> Result<Option<ChatSnapshot>>;

    /// Replaces the stored snapshot. Any success answer is accepted.
    async fn save(&self, snapshot: &ChatSnapshot) -> Result<()>;
}
