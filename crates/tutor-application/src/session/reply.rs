//! Send, reply and edit flows.
//!
//! A message is written in two phases. [`ChatSessionEngine::append_user_message`]
//! stores the user text with an empty reply and returns a [`PendingReply`]
//! ticket; [`ChatSessionEngine::resolve_reply`] fetches the reply and writes it
//! into exactly that turn. Both phases persist and render on their own, so the
//! message is visible immediately and the final outcome (reply or failure text)
//! always reaches the store.

use super::engine::ChatSessionEngine;
use super::messages::{self, AUTH_REQUIRED, TITLE_AI_ERROR, TITLE_NETWORK_ERROR};
use tutor_core::chat::{NO_REPLY, PendingReply, build_transcript};
use tutor_core::error::{Result, TutorError};
use tutor_core::interaction::RenderScope;
use tutor_core::remote::{AiReply, AlgebraAction};

/// How a pending reply was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply was written. Carries the expression the server offered
    /// simplify / solve follow-ups for, if any.
    Answered { algebra_options: Option<String> },
    /// A failure text was written into the turn and the user was notified.
    Failed,
    /// The turn was deleted, renamed away or edited while the reply was in
    /// flight; nothing was written.
    Discarded,
}

/// What to write into the turn and what to tell the user.
struct Resolution {
    bot: String,
    notice: Option<(String, &'static str)>,
    algebra_options: Option<String>,
}

impl Resolution {
    fn answered(reply: Option<String>, algebra_options: Option<String>) -> Self {
        Self {
            bot: reply
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| NO_REPLY.to_string()),
            notice: None,
            algebra_options,
        }
    }

    fn failed(bot: String, notice: String, title: &'static str) -> Self {
        Self {
            bot,
            notice: Some((notice, title)),
            algebra_options: None,
        }
    }
}

impl ChatSessionEngine {
    /// Appends the user's message to the current chat with its reply pending.
    ///
    /// Returns `None` for blank text, which is silently ignored.
    pub async fn append_user_message(&self, text: &str) -> Result<Option<PendingReply>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let ticket = self
            .commit(RenderScope::MESSAGES, |state| state.append_user_message(text))
            .await?;
        tracing::debug!(
            "[ChatSessionEngine] Appended turn {} to '{}'",
            ticket.index,
            ticket.chat_id
        );
        Ok(Some(ticket))
    }

    /// Fetches the reply for `ticket` and writes it, or the failure text, into
    /// the turn.
    ///
    /// AI chats send the whole role-tagged transcript; other chats send the
    /// raw message text.
    ///
    /// # Errors
    ///
    /// Only `AuthExpired`, after the user was notified and sent to login. The
    /// turn keeps its pending reply.
    pub async fn resolve_reply(&self, ticket: PendingReply) -> Result<ReplyOutcome> {
        let (is_ai, transcript) = {
            let state = self.state.read().await;
            let is_ai = state.is_ai(&ticket.chat_id);
            let transcript = if is_ai {
                let turns = state.chat(&ticket.chat_id).unwrap_or(&[]);
                let upto = turns.len().min(ticket.index + 1);
                build_transcript(&self.system_prompt, &turns[..upto])
            } else {
                Vec::new()
            };
            (is_ai, transcript)
        };

        let resolution = if is_ai {
            match self
                .backends
                .ai
                .fetch_ai_reply(&ticket.chat_id, &transcript)
                .await
            {
                Ok(AiReply::Reply(reply)) => Resolution::answered(reply, None),
                Ok(AiReply::Failed(error)) => {
                    let text = messages::ai_error(&error);
                    Resolution::failed(text.clone(), text, TITLE_AI_ERROR)
                }
                Err(err) => {
                    self.fetch_failed(err, messages::ai_failure, messages::ai_failure)
                        .await?
                }
            }
        } else {
            match self.backends.compute.fetch_reply(&ticket.user_text).await {
                Ok(reply) => {
                    let options = reply.algebra_options().map(str::to_string);
                    Resolution::answered(reply.reply, options)
                }
                Err(err) => {
                    self.fetch_failed(
                        err,
                        messages::server_failure,
                        messages::server_failure_notice,
                    )
                    .await?
                }
            }
        };

        self.write_resolution(&ticket, resolution).await
    }

    /// Turns a failed fetch into the failure text for the turn. An
    /// unauthorized answer expires the session instead.
    async fn fetch_failed(
        &self,
        err: TutorError,
        bot: fn(&str) -> String,
        notice: fn(&str) -> String,
    ) -> Result<Resolution> {
        if err.is_auth_expired() {
            self.guard.expire(AUTH_REQUIRED).await;
            return Err(err);
        }
        tracing::warn!("[ChatSessionEngine] Reply fetch failed: {}", err);
        let reason = err.reason();
        Ok(Resolution::failed(
            bot(&reason),
            notice(&reason),
            TITLE_NETWORK_ERROR,
        ))
    }

    async fn write_resolution(
        &self,
        ticket: &PendingReply,
        resolution: Resolution,
    ) -> Result<ReplyOutcome> {
        let Resolution {
            bot,
            notice,
            algebra_options,
        } = resolution;

        let written = self
            .commit(RenderScope::MESSAGES, |state| state.fill_reply(ticket, bot))
            .await;
        if let Err(err) = written {
            tracing::warn!(
                "[ChatSessionEngine] Discarding reply for '{}' turn {}: {}",
                ticket.chat_id,
                ticket.index,
                err
            );
            return Ok(ReplyOutcome::Discarded);
        }

        match notice {
            Some((message, title)) => {
                self.ui.dialogs.notify(&message, title).await;
                Ok(ReplyOutcome::Failed)
            }
            None => Ok(ReplyOutcome::Answered { algebra_options }),
        }
    }

    /// Appends `text` and resolves its reply.
    ///
    /// Returns `None` for blank text.
    pub async fn send_message(&self, text: &str) -> Result<Option<ReplyOutcome>> {
        match self.append_user_message(text).await? {
            Some(ticket) => self.resolve_reply(ticket).await.map(Some),
            None => Ok(None),
        }
    }

    /// Sends `simplify <expr>` or `solve <expr>` through the normal message flow.
    pub async fn send_algebra_action(
        &self,
        action: AlgebraAction,
        expr: &str,
    ) -> Result<Option<ReplyOutcome>> {
        self.send_message(&action.message(expr)).await
    }

    /// Lets the user rewrite the message at `index` of the current chat.
    ///
    /// The reply is reset to the resend marker; nothing is fetched. Returns
    /// false when the user cancelled.
    pub async fn edit_message(&self, index: usize) -> Result<bool> {
        let (chat_id, current) = {
            let state = self.state.read().await;
            let chat_id = state.current_chat_id().to_string();
            let current = state
                .current_chat()
                .get(index)
                .map(|turn| turn.user.clone())
                .ok_or_else(|| TutorError::not_found("Turn", format!("{}#{}", chat_id, index)))?;
            (chat_id, current)
        };

        let Some(text) = self.ui.dialogs.edit_text(&current).await else {
            return Ok(false);
        };
        self.commit(RenderScope::MESSAGES, |state| {
            state.edit_turn(&chat_id, index, text)
        })
        .await?;
        tracing::debug!("[ChatSessionEngine] Edited turn {} of '{}'", index, chat_id);
        Ok(true)
    }
}
