//! AI chat generation trait.

use crate::chat::Chat;
use crate::error::Result;
use async_trait::async_trait;

/// A chat proposed by the server: a name and its opening turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedChat {
    pub name: String,
    pub turns: Chat,
}

/// Asks the server to start a new AI chat on an optional topic.
///
/// # Errors
///
/// - `AuthExpired` on an unauthorized answer
/// - `Application` with the server's message (or `Server error: <status>`) on
///   any other non-success answer
/// - `MalformedResponse` when a success body lacks the name or message list
/// - `Transport` when no response arrived
#[async_trait]
pub trait ChatGenerator: Send + Sync {
    async fn generate_chat(&self, topic: &str) -> Result<GeneratedChat>;
}
