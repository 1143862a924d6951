//! HTTP transport for every remote collaborator of the session engine.
//!
//! One `reqwest::Client` is shared by the snapshot store, both reply fetchers
//! and the chat generator. The session cookie, when configured, is attached to
//! every request as a default header.

use crate::dto::{
    AiReplyRequest, AiReplyResponse, NewAiChatRequest, NewAiChatResponse, ReplyRequest,
    SnapshotDto,
};
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tutor_core::chat::{ChatSnapshot, TranscriptEntry};
use tutor_core::config::ClientConfig;
use tutor_core::error::{Result, TutorError};
use tutor_core::remote::{
    AiReply, AiReplyFetcher, ChatGenerator, ChatStore, ComputeReply, GeneratedChat, ReplyFetcher,
};

/// reqwest-backed implementation of the remote traits.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie.as_deref() {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| TutorError::config(format!("Invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TutorError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Absolute URL of the login boundary.
    pub fn login_url(&self) -> String {
        self.config.url(&self.config.endpoints.login)
    }

    /// Absolute URL of the logout boundary.
    pub fn logout_url(&self) -> String {
        self.config.url(&self.config.endpoints.logout)
    }

    async fn send(&self, request: reqwest::RequestBuilder, endpoint: &str) -> Result<Response> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!("[HttpBackend] {} request failed: {}", endpoint, err);
            TutorError::transport(err.to_string())
        })?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("[HttpBackend] {} answered 401", endpoint);
            return Err(TutorError::AuthExpired);
        }
        Ok(response)
    }
}

/// Reads the whole body and parses it as JSON.
async fn read_json<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|err| TutorError::transport(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| {
        TutorError::malformed(format!("{} returned an unreadable body: {}", endpoint, err))
    })
}

fn server_error(status: StatusCode) -> String {
    format!("Server error: {}", status.as_u16())
}

#[async_trait]
impl ChatStore for HttpBackend {
    async fn load(&self) -> Result<Option<ChatSnapshot>> {
        let url = self.config.url(&self.config.endpoints.snapshot);
        let response = self.send(self.client.get(&url), "snapshot").await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TutorError::application(server_error(status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| TutorError::transport(err.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let dto: Option<SnapshotDto> = serde_json::from_slice(&bytes).map_err(|err| {
            TutorError::malformed(format!("snapshot returned an unreadable body: {}", err))
        })?;
        tracing::debug!("[HttpBackend] Loaded snapshot (present: {})", dto.is_some());
        Ok(dto.map(SnapshotDto::into_domain))
    }

    async fn save(&self, snapshot: &ChatSnapshot) -> Result<()> {
        let url = self.config.url(&self.config.endpoints.snapshot);
        let body = SnapshotDto::from_domain(snapshot);
        let response = self
            .send(self.client.post(&url).json(&body), "snapshot")
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TutorError::application(server_error(status)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplyFetcher for HttpBackend {
    async fn fetch_reply(&self, message: &str) -> Result<ComputeReply> {
        let url = self.config.url(&self.config.endpoints.reply);
        let response = self
            .send(self.client.post(&url).json(&ReplyRequest { message }), "reply")
            .await?;
        read_json(response, "reply").await
    }
}

#[async_trait]
impl AiReplyFetcher for HttpBackend {
    async fn fetch_ai_reply(&self, chat_id: &str, transcript: &[TranscriptEntry]) -> Result<AiReply> {
        let url = self.config.url(&self.config.endpoints.ai_reply);
        let body = AiReplyRequest::new(chat_id, transcript);
        let response = self
            .send(self.client.post(&url).json(&body), "ai_reply")
            .await?;
        let status = response.status();
        if status.is_success() {
            let dto: AiReplyResponse = read_json(response, "ai_reply").await?;
            return Ok(dto.into());
        }

        let dto: AiReplyResponse = read_json(response, "ai_reply").await.unwrap_or_default();
        Ok(AiReply::Failed(
            dto.error.unwrap_or_else(|| server_error(status)),
        ))
    }
}

#[async_trait]
impl ChatGenerator for HttpBackend {
    async fn generate_chat(&self, topic: &str) -> Result<GeneratedChat> {
        let url = self.config.url(&self.config.endpoints.new_ai_chat);
        let response = self
            .send(
                self.client.post(&url).json(&NewAiChatRequest { topic }),
                "new_ai_chat",
            )
            .await?;
        let status = response.status();
        if !status.is_success() {
            let dto: NewAiChatResponse = read_json(response, "new_ai_chat")
                .await
                .unwrap_or_default();
            return Err(TutorError::application(
                dto.error.unwrap_or_else(|| server_error(status)),
            ));
        }

        let dto: NewAiChatResponse = read_json(response, "new_ai_chat").await.map_err(|err| {
            tracing::warn!("[HttpBackend] new_ai_chat: {}", err);
            TutorError::malformed("Failed to create AI chat. Server returned unexpected data.")
        })?;
        dto.into_generated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_urls() {
        let mut config = ClientConfig::default();
        config.base_url = "https://tutor.example.org/".to_string();
        let backend = HttpBackend::new(config).unwrap();
        assert_eq!(backend.login_url(), "https://tutor.example.org/login");
        assert_eq!(backend.logout_url(), "https://tutor.example.org/logout");
    }

    #[test]
    fn test_invalid_cookie_is_a_config_error() {
        let mut config = ClientConfig::default();
        config.session_cookie = Some("bad\ncookie".to_string());
        let err = HttpBackend::new(config).unwrap_err();
        assert!(matches!(err, TutorError::Config(_)));
    }
}
