//! Render projection of the session state.
//!
//! `SessionView` is a pure function of [`SessionState`]; renderers never read
//! the state directly.

use super::state::SessionState;

/// Suffix appended to the label of AI-backed chats.
pub const AI_LABEL_SUFFIX: &str = " (AI)";

/// One row of a chat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: String,
    pub label: String,
    pub is_current: bool,
}

/// One rendered turn of the current chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub index: usize,
    pub user: String,
    pub bot: String,
}

/// Everything a renderer needs to paint the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub title: String,
    pub chats: Vec<ChatEntry>,
    pub archived: Vec<ChatEntry>,
    pub messages: Vec<MessageView>,
}

impl SessionView {
    pub fn project(state: &SessionState) -> Self {
        let current = state.current_chat_id();
        let chats = state
            .active()
            .keys()
            .map(|id| ChatEntry {
                id: id.clone(),
                label: label(id, state.is_ai(id)),
                is_current: id == current,
            })
            .collect();
        let archived = state
            .archived()
            .iter()
            .map(|(id, chat)| ChatEntry {
                id: id.clone(),
                label: label(id, chat.metadata.map(|m| m.ai).unwrap_or(false)),
                is_current: false,
            })
            .collect();
        let messages = state
            .current_chat()
            .iter()
            .enumerate()
            .map(|(index, turn)| MessageView {
                index,
                user: turn.user.clone(),
                bot: turn.bot.clone(),
            })
            .collect();

        Self {
            title: label(current, state.is_ai(current)),
            chats,
            archived,
            messages,
        }
    }
}

fn label(id: &str, ai: bool) -> String {
    if ai {
        format!("{}{}", id, AI_LABEL_SUFFIX)
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::model::Turn;

    #[test]
    fn test_project_labels_ai_chats() {
        let mut state = SessionState::default();
        state.insert_ai_chat("Fractions", vec![Turn::pending("1/2 + 1/4")]);
        state.create_chat();
        state.select_chat("Fractions").unwrap();
        state.archive_chat("Chat 2").unwrap();

        let view = SessionView::project(&state);
        assert_eq!(view.title, "Fractions (AI)");
        let labels: Vec<&str> = view.chats.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Chat 1", "Fractions (AI)"]);
        assert!(view.chats[1].is_current);
        assert_eq!(view.archived[0].label, "Chat 2");
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].user, "1/2 + 1/4");
    }
}
