//! Chat domain model.
//!
//! A chat is identified by its display name. Turns pair one user utterance with
//! its (possibly pending) reply; metadata travels with the chat it describes.

use serde::{Deserialize, Serialize};

/// Bot text of a turn whose reply has not arrived yet.
pub const PENDING_REPLY: &str = "";

/// Bot text written when the server answered without a reply field.
pub const NO_REPLY: &str = "(no reply)";

/// Bot text written when the user edits a turn; the reply must be re-requested.
pub const EDITED_NEEDS_RESEND: &str = "(edited — resend to update)";

/// Display name acting as the primary key of a chat.
pub type ChatId = String;

/// One user message paired with its reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub bot: String,
}

impl Turn {
    /// Creates a turn whose reply is still pending.
    pub fn pending(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: PENDING_REPLY.to_string(),
        }
    }
}

/// Ordered conversation. Insertion order is conversational order.
pub type Chat = Vec<Turn>;

/// Per-chat flags stored next to the chat content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMetadata {
    #[serde(default)]
    pub ai: bool,
}

impl ChatMetadata {
    /// Metadata of a chat backed by the generative tutor.
    pub fn ai() -> Self {
        Self { ai: true }
    }
}

/// An archived chat together with the metadata it had while active.
///
/// Keeping both in one value means archive/unarchive can never separate them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivedChat {
    pub turns: Chat,
    pub metadata: Option<ChatMetadata>,
}

/// Which of the two chat lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatList {
    Active,
    Archived,
}

impl std::fmt::Display for ChatList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatList::Active => write!(f, "active"),
            ChatList::Archived => write!(f, "archived"),
        }
    }
}
