//! Session state and its invariant-preserving mutations.
//!
//! Every mutation either succeeds completely or returns an error with the
//! state left untouched. Validation always happens before the first write.

use super::model::{
    ArchivedChat, Chat, ChatId, ChatList, ChatMetadata, EDITED_NEEDS_RESEND, PENDING_REPLY, Turn,
};
use super::naming::{disambiguate, next_numbered_name};
use super::snapshot::ChatSnapshot;
use crate::error::{Result, TutorError};
use indexmap::IndexMap;

/// Prefix of generated chat names (`Chat 1`, `Chat 2`, ...).
pub const DEFAULT_CHAT_PREFIX: &str = "Chat";

/// Ticket identifying the turn that awaits a reply.
///
/// Issued by [`SessionState::append_user_message`] and redeemed by
/// [`SessionState::fill_reply`]. The user text is kept so a late reply can
/// detect that the turn was edited in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub chat_id: ChatId,
    pub index: usize,
    pub user_text: String,
}

/// In-memory model of the user's conversations.
///
/// - `active` and `archived` hold the two chat lists in display order
/// - `metadata` describes active chats only; archived chats carry their own
/// - `current` always names an active chat and `active` is never empty
///
/// The one tolerated overlap between the lists is the replenishment default
/// chat, which may shadow an archived chat of the same name. Such an archived
/// chat can only be restored after the active one is renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    active: IndexMap<ChatId, Chat>,
    archived: IndexMap<ChatId, ArchivedChat>,
    metadata: IndexMap<ChatId, ChatMetadata>,
    current: ChatId,
    prefix: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_PREFIX)
    }
}

impl SessionState {
    /// Creates a state holding a single empty default chat.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let default = default_chat_name(&prefix);
        let mut active = IndexMap::new();
        active.insert(default.clone(), Chat::new());
        Self {
            active,
            archived: IndexMap::new(),
            metadata: IndexMap::new(),
            current: default,
            prefix,
        }
    }

    /// Builds the state from a remote snapshot, repairing anything that would
    /// break the model's invariants.
    ///
    /// - a missing snapshot or an empty active list yields the default chat
    /// - metadata without an active chat is dropped
    /// - an archived chat whose name is also active is re-keyed with a ` (n)` suffix
    pub fn from_snapshot(snapshot: Option<ChatSnapshot>, prefix: impl Into<String>) -> Self {
        let mut state = Self::new(prefix);
        let Some(snapshot) = snapshot else {
            return state;
        };

        let ChatSnapshot {
            active,
            archived,
            meta,
        } = snapshot;

        if !active.is_empty() {
            state.active = active;
        }

        for (id, chat) in archived {
            let key = if state.active.contains_key(&id) || state.archived.contains_key(&id) {
                let renamed = disambiguate(&id, |n| {
                    state.active.contains_key(n) || state.archived.contains_key(n)
                });
                tracing::warn!(
                    "[SessionState] Archived chat '{}' collides with an active chat, re-keyed as '{}'",
                    id,
                    renamed
                );
                renamed
            } else {
                id
            };
            state.archived.insert(key, chat);
        }

        for (id, meta) in meta {
            if state.active.contains_key(&id) {
                state.metadata.insert(id, meta);
            } else {
                tracing::warn!("[SessionState] Dropping metadata for unknown chat '{}'", id);
            }
        }

        state.current = state
            .active
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| default_chat_name(&state.prefix));
        state
    }

    /// Returns the full snapshot to push to the remote store.
    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            active: self.active.clone(),
            archived: self.archived.clone(),
            meta: self.metadata.clone(),
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn active(&self) -> &IndexMap<ChatId, Chat> {
        &self.active
    }

    pub fn archived(&self) -> &IndexMap<ChatId, ArchivedChat> {
        &self.archived
    }

    pub fn metadata(&self) -> &IndexMap<ChatId, ChatMetadata> {
        &self.metadata
    }

    pub fn current_chat_id(&self) -> &str {
        &self.current
    }

    /// Turns of the current chat.
    pub fn current_chat(&self) -> &[Turn] {
        self.active
            .get(&self.current)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Looks up a chat by name, active list first.
    pub fn chat(&self, id: &str) -> Option<&[Turn]> {
        self.active
            .get(id)
            .map(|c| c.as_slice())
            .or_else(|| self.archived.get(id).map(|a| a.turns.as_slice()))
    }

    /// Returns true when the active chat `id` is AI-backed.
    pub fn is_ai(&self, id: &str) -> bool {
        self.metadata.get(id).map(|m| m.ai).unwrap_or(false)
    }

    /// Returns true when `id` is a key of either list.
    pub fn is_taken(&self, id: &str) -> bool {
        self.active.contains_key(id) || self.archived.contains_key(id)
    }

    // ============================================================================
    // Lifecycle operations
    // ============================================================================

    /// Creates the lowest-numbered free `Chat <n>` and makes it current.
    pub fn create_chat(&mut self) -> ChatId {
        let name = next_numbered_name(&self.prefix, |n| self.is_taken(n));
        self.active.insert(name.clone(), Chat::new());
        self.current = name.clone();
        name
    }

    /// Inserts a server-generated AI chat under a collision-free name and makes
    /// it current.
    pub fn insert_ai_chat(&mut self, proposed: &str, turns: Chat) -> ChatId {
        let name = disambiguate(proposed, |n| self.is_taken(n));
        self.active.insert(name.clone(), turns);
        self.metadata.insert(name.clone(), ChatMetadata::ai());
        self.current = name.clone();
        name
    }

    /// Renames a chat, moving its metadata along with it.
    ///
    /// The new name is trimmed. When `old` exists in both lists the active chat
    /// is renamed. Returns the list the chat lives in.
    pub fn rename_chat(&mut self, old: &str, new: &str) -> Result<ChatList> {
        let new = new.trim();
        if new.is_empty() || self.is_taken(new) {
            return Err(TutorError::validation("Chat name invalid or duplicate."));
        }

        if let Some(index) = self.active.get_index_of(old) {
            let (_, turns) = self
                .active
                .shift_remove_index(index)
                .ok_or_else(|| TutorError::internal("active index vanished"))?;
            self.active.shift_insert(index, new.to_string(), turns);
            if let Some(meta) = self.metadata.shift_remove(old) {
                self.metadata.insert(new.to_string(), meta);
            }
            if self.current == old {
                self.current = new.to_string();
            }
            return Ok(ChatList::Active);
        }

        if let Some(index) = self.archived.get_index_of(old) {
            let (_, chat) = self
                .archived
                .shift_remove_index(index)
                .ok_or_else(|| TutorError::internal("archived index vanished"))?;
            self.archived.shift_insert(index, new.to_string(), chat);
            return Ok(ChatList::Archived);
        }

        Err(TutorError::not_found("Chat", old))
    }

    /// Moves an active chat and its metadata into the archive.
    pub fn archive_chat(&mut self, id: &str) -> Result<()> {
        if self.archived.contains_key(id) {
            return Err(TutorError::validation(
                "An archived chat with the same name exists. Rename first.",
            ));
        }
        let turns = self
            .active
            .shift_remove(id)
            .ok_or_else(|| TutorError::not_found("Chat", id))?;
        let metadata = self.metadata.shift_remove(id);
        self.archived
            .insert(id.to_string(), ArchivedChat { turns, metadata });
        if self.current == id {
            self.reassign_current();
        }
        Ok(())
    }

    /// Restores an archived chat and makes it current.
    pub fn unarchive_chat(&mut self, id: &str) -> Result<()> {
        if self.active.contains_key(id) {
            return Err(TutorError::validation(
                "Active chat with same name exists. Rename first.",
            ));
        }
        let ArchivedChat { turns, metadata } = self
            .archived
            .shift_remove(id)
            .ok_or_else(|| TutorError::not_found("Archived chat", id))?;
        self.active.insert(id.to_string(), turns);
        if let Some(meta) = metadata {
            self.metadata.insert(id.to_string(), meta);
        }
        self.current = id.to_string();
        Ok(())
    }

    /// Deletes a chat and its metadata from the given list.
    pub fn delete_chat(&mut self, id: &str, list: ChatList) -> Result<()> {
        match list {
            ChatList::Active => {
                self.active
                    .shift_remove(id)
                    .ok_or_else(|| TutorError::not_found("Chat", id))?;
                self.metadata.shift_remove(id);
                if self.current == id {
                    self.reassign_current();
                }
            }
            ChatList::Archived => {
                self.archived
                    .shift_remove(id)
                    .ok_or_else(|| TutorError::not_found("Archived chat", id))?;
            }
        }
        Ok(())
    }

    /// Replaces every active chat with one empty default chat. The archive is
    /// left alone.
    pub fn delete_all_active(&mut self) {
        let default = default_chat_name(&self.prefix);
        self.active.clear();
        self.metadata.clear();
        self.active.insert(default.clone(), Chat::new());
        self.current = default;
    }

    /// Makes an active chat current.
    pub fn select_chat(&mut self, id: &str) -> Result<()> {
        if !self.active.contains_key(id) {
            return Err(TutorError::not_found("Chat", id));
        }
        self.current = id.to_string();
        Ok(())
    }

    // ============================================================================
    // Message operations
    // ============================================================================

    /// Appends `{user: text, bot: ""}` to the current chat.
    ///
    /// Whitespace-only text is rejected. The stored text is trimmed.
    pub fn append_user_message(&mut self, text: &str) -> Result<PendingReply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TutorError::validation("Message is empty"));
        }
        let chat_id = self.current.clone();
        let chat = self.active.entry(chat_id.clone()).or_default();
        chat.push(Turn::pending(text));
        Ok(PendingReply {
            chat_id,
            index: chat.len() - 1,
            user_text: text.to_string(),
        })
    }

    /// Writes the reply for a pending turn.
    ///
    /// Fails with `NotFound` when the chat is gone (deleted or renamed) or the
    /// turn no longer matches the ticket because it was edited.
    pub fn fill_reply(&mut self, ticket: &PendingReply, bot: impl Into<String>) -> Result<()> {
        let turn = self
            .turn_mut(&ticket.chat_id, ticket.index)
            .filter(|t| t.user == ticket.user_text && t.bot == PENDING_REPLY)
            .ok_or_else(|| {
                TutorError::not_found("Turn", format!("{}#{}", ticket.chat_id, ticket.index))
            })?;
        turn.bot = bot.into();
        Ok(())
    }

    /// Overwrites the user text of a turn in an active chat and marks its
    /// reply as needing a resend.
    pub fn edit_turn(&mut self, chat_id: &str, index: usize, text: impl Into<String>) -> Result<()> {
        let turn = self
            .active
            .get_mut(chat_id)
            .and_then(|c| c.get_mut(index))
            .ok_or_else(|| TutorError::not_found("Turn", format!("{}#{}", chat_id, index)))?;
        turn.user = text.into();
        turn.bot = EDITED_NEEDS_RESEND.to_string();
        Ok(())
    }

    fn turn_mut(&mut self, chat_id: &str, index: usize) -> Option<&mut Turn> {
        if let Some(chat) = self.active.get_mut(chat_id) {
            return chat.get_mut(index);
        }
        self.archived
            .get_mut(chat_id)
            .and_then(|a| a.turns.get_mut(index))
    }

    /// Points `current` at the first remaining active chat, creating the
    /// default chat when none remain.
    fn reassign_current(&mut self) {
        match self.active.keys().next() {
            Some(first) => self.current = first.clone(),
            None => {
                let default = default_chat_name(&self.prefix);
                self.active.insert(default.clone(), Chat::new());
                self.current = default;
            }
        }
    }
}

fn default_chat_name(prefix: &str) -> String {
    format!("{} 1", prefix)
}
