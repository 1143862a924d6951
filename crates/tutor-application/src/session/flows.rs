//! Dialog-mediated operations.
//!
//! Each flow asks the user first and runs the underlying engine operation
//! only on a positive answer. Cancelling a dialog is a full no-op.

use super::engine::ChatSessionEngine;
use super::messages::{
    self, RENAME_PROMPT_TITLE, TITLE_AI_CHAT_CREATED, TOPIC_PROMPT_PLACEHOLDER, TOPIC_PROMPT_TITLE,
};
use tutor_core::chat::{ChatId, ChatList};
use tutor_core::error::{Result, TutorError};

impl ChatSessionEngine {
    /// Prompts for a new name, pre-filled with the current one.
    ///
    /// Returns `None` when the user cancelled.
    pub async fn rename_chat_interactive(&self, old: &str) -> Result<Option<ChatList>> {
        let Some(new) = self.ui.dialogs.prompt(RENAME_PROMPT_TITLE, "", old).await else {
            return Ok(None);
        };
        self.rename_chat(old, &new).await.map(Some)
    }

    /// Deletes a chat after confirmation. Returns false when declined.
    pub async fn delete_chat_interactive(&self, id: &str, list: ChatList) -> Result<bool> {
        if !self.ui.dialogs.confirm(&messages::confirm_delete(id)).await {
            return Ok(false);
        }
        self.delete_chat(id, list).await?;
        Ok(true)
    }

    /// Prompts for an optional topic, generates an AI chat and announces it.
    ///
    /// A cancelled prompt generates a chat without a topic.
    pub async fn create_ai_chat_interactive(&self) -> Result<ChatId> {
        if self.is_generating() {
            return Err(TutorError::validation(
                "An AI chat is already being generated.",
            ));
        }
        let topic = self
            .ui
            .dialogs
            .prompt(TOPIC_PROMPT_TITLE, TOPIC_PROMPT_PLACEHOLDER, "")
            .await
            .unwrap_or_default();
        let id = self.create_ai_chat(&topic).await?;
        self.ui
            .dialogs
            .notify(&messages::ai_chat_created(&id), TITLE_AI_CHAT_CREATED)
            .await;
        Ok(id)
    }
}
