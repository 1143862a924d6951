//! Role-tagged transcript sent to the generative tutor.

use super::model::Turn;
use serde::{Deserialize, Serialize};

/// Instruction placed at the head of every AI transcript unless configured otherwise.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a precise math tutor. When given arithmetic or algebra, produce a clear, correct solution and steps. Respond only with the assistant's content (no JSON) when used as assistant. The client expects plain text or simple HTML (<strong>, <br>, <code>).";

/// Speaker of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptRole {
    System,
    User,
    Assistant,
}

/// One message of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: TranscriptRole,
    pub text: String,
}

impl TranscriptEntry {
    fn new(role: TranscriptRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Builds the transcript for a chat: the system instruction, then one user
/// entry per non-blank `user` field and one assistant entry per non-blank
/// `bot` field, in turn order.
///
/// The pending turn contributes only its user entry because its `bot` is empty.
pub fn build_transcript(system_prompt: &str, turns: &[Turn]) -> Vec<TranscriptEntry> {
    let mut entries = Vec::with_capacity(turns.len() * 2 + 1);
    entries.push(TranscriptEntry::new(TranscriptRole::System, system_prompt));
    for turn in turns {
        if !turn.user.trim().is_empty() {
            entries.push(TranscriptEntry::new(TranscriptRole::User, turn.user.as_str()));
        }
        if !turn.bot.trim().is_empty() {
            entries.push(TranscriptEntry::new(TranscriptRole::Assistant, turn.bot.as_str()));
        }
    }
    entries
}
