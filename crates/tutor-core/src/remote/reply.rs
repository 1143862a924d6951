//! Reply fetcher traits.

use crate::chat::TranscriptEntry;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reply kind the compute endpoint uses when it wants the user to choose
/// between simplifying and solving an expression.
pub const ALGEBRA_OPTIONS_KIND: &str = "algebra_options";

/// Answer of the deterministic compute endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub expr: Option<String>,
}

impl ComputeReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Default::default()
        }
    }

    /// Returns the expression offered for a follow-up action, if any.
    pub fn algebra_options(&self) -> Option<&str> {
        match (self.kind.as_deref(), self.expr.as_deref()) {
            (Some(ALGEBRA_OPTIONS_KIND), Some(expr)) if !expr.trim().is_empty() => Some(expr),
            _ => None,
        }
    }
}

/// Follow-up the user can pick for an algebra expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgebraAction {
    Simplify,
    Solve,
}

impl AlgebraAction {
    /// Message text sent for this action.
    pub fn message(&self, expr: &str) -> String {
        match self {
            AlgebraAction::Simplify => format!("simplify {}", expr),
            AlgebraAction::Solve => format!("solve {}", expr),
        }
    }
}

/// Answer of the AI endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiReply {
    /// The model answered; `None` when the reply field was absent.
    Reply(Option<String>),
    /// The server reported an application-level error.
    Failed(String),
}

/// Deterministic reply: takes the raw message text.
#[async_trait]
pub trait ReplyFetcher: Send + Sync {
    async fn fetch_reply(&self, message: &str) -> Result<ComputeReply>;
}

/// Generative reply: takes the whole role-tagged transcript.
#[async_trait]
pub trait AiReplyFetcher: Send + Sync {
    async fn fetch_ai_reply(&self, chat_id: &str, transcript: &[TranscriptEntry]) -> Result<AiReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebra_options_requires_kind_and_expr() {
        let reply: ComputeReply = serde_json::from_str(
            r#"{"reply": "Simplify or solve?", "type": "algebra_options", "expr": "2x+4=0"}"#,
        )
        .unwrap();
        assert_eq!(reply.algebra_options(), Some("2x+4=0"));

        let plain = ComputeReply::text("4");
        assert_eq!(plain.algebra_options(), None);
    }

    #[test]
    fn test_algebra_action_message() {
        assert_eq!(AlgebraAction::Solve.message("x+1=2"), "solve x+1=2");
        assert_eq!(AlgebraAction::Simplify.message("2x+2x"), "simplify 2x+2x");
    }
}
