//! Full-state snapshot exchanged with the remote store.

use super::model::{ArchivedChat, Chat, ChatId, ChatMetadata};
use indexmap::IndexMap;

/// Complete serialized session: both chat lists plus active-chat metadata.
///
/// Archived chats carry their metadata inside [`ArchivedChat`], so `meta`
/// only ever describes active chats. The wire encoding of this type lives in
/// the infrastructure layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSnapshot {
    pub active: IndexMap<ChatId, Chat>,
    pub archived: IndexMap<ChatId, ArchivedChat>,
    pub meta: IndexMap<ChatId, ChatMetadata>,
}

impl ChatSnapshot {
    /// Total number of chats across both lists.
    pub fn chat_count(&self) -> usize {
        self.active.len() + self.archived.len()
    }
}
