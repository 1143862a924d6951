//! Request and response bodies of the reply and generation endpoints.

use serde::{Deserialize, Serialize};
use tutor_core::chat::{TranscriptEntry, TranscriptRole, Turn};
use tutor_core::error::{Result, TutorError};
use tutor_core::remote::{AiReply, GeneratedChat};

/// A turn as stored by the server. Missing or null fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDto {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot: Option<String>,
}

impl From<TurnDto> for Turn {
    fn from(dto: TurnDto) -> Self {
        Turn {
            user: dto.user.unwrap_or_default(),
            bot: dto.bot.unwrap_or_default(),
        }
    }
}

impl From<&Turn> for TurnDto {
    fn from(turn: &Turn) -> Self {
        TurnDto {
            user: Some(turn.user.clone()),
            bot: Some(turn.bot.clone()),
        }
    }
}

/// Body of the deterministic reply request.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentPartDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiMessageDto {
    pub role: TranscriptRole,
    pub content: Vec<ContentPartDto>,
}

impl From<&TranscriptEntry> for AiMessageDto {
    fn from(entry: &TranscriptEntry) -> Self {
        AiMessageDto {
            role: entry.role,
            content: vec![ContentPartDto {
                kind: "text",
                text: entry.text.clone(),
            }],
        }
    }
}

/// Body of the AI reply request.
#[derive(Debug, Clone, Serialize)]
pub struct AiReplyRequest<'a> {
    pub chat_id: &'a str,
    pub messages: Vec<AiMessageDto>,
}

impl<'a> AiReplyRequest<'a> {
    pub fn new(chat_id: &'a str, transcript: &[TranscriptEntry]) -> Self {
        Self {
            chat_id,
            messages: transcript.iter().map(AiMessageDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiReplyResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<AiReplyResponse> for AiReply {
    fn from(dto: AiReplyResponse) -> Self {
        match dto.error {
            Some(error) => AiReply::Failed(error),
            None => AiReply::Reply(dto.reply),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAiChatRequest<'a> {
    pub topic: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAiChatResponse {
    #[serde(default)]
    pub chat_name: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<TurnDto>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl NewAiChatResponse {
    /// Converts a success body, rejecting one without a name or message list.
    pub fn into_generated(self) -> Result<GeneratedChat> {
        match (self.chat_name, self.messages) {
            (Some(name), Some(messages)) if !name.is_empty() => Ok(GeneratedChat {
                name,
                turns: messages.into_iter().map(Turn::from).collect(),
            }),
            _ => Err(TutorError::malformed(
                "Failed to create AI chat. Server returned unexpected data.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ai_request_shape() {
        let transcript = vec![
            TranscriptEntry {
                role: TranscriptRole::System,
                text: "be precise".into(),
            },
            TranscriptEntry {
                role: TranscriptRole::User,
                text: "2+2".into(),
            },
        ];
        let body = serde_json::to_value(AiReplyRequest::new("Chat 1", &transcript)).unwrap();
        assert_eq!(
            body,
            json!({
                "chat_id": "Chat 1",
                "messages": [
                    {"role": "system", "content": [{"type": "text", "text": "be precise"}]},
                    {"role": "user", "content": [{"type": "text", "text": "2+2"}]},
                ]
            })
        );
    }

    #[test]
    fn test_ai_response_error_wins() {
        let dto: AiReplyResponse =
            serde_json::from_value(json!({"reply": "ignored", "error": "rate limited"})).unwrap();
        assert_eq!(AiReply::from(dto), AiReply::Failed("rate limited".into()));

        let dto: AiReplyResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(AiReply::from(dto), AiReply::Reply(None));
    }

    #[test]
    fn test_new_ai_chat_requires_fields() {
        let ok: NewAiChatResponse = serde_json::from_value(json!({
            "chat_name": "Fractions",
            "messages": [{"user": "Hello", "bot": null}]
        }))
        .unwrap();
        let chat = ok.into_generated().unwrap();
        assert_eq!(chat.name, "Fractions");
        assert_eq!(chat.turns, vec![Turn {
            user: "Hello".into(),
            bot: String::new()
        }]);

        let missing: NewAiChatResponse =
            serde_json::from_value(json!({"chat_name": "Fractions"})).unwrap();
        assert!(matches!(
            missing.into_generated(),
            Err(TutorError::MalformedResponse(_))
        ));
    }
}
