//! Client configuration model.
//!
//! Loaded by `tutor_infrastructure::ConfigService` from `config.toml`; every
//! field has a default so a missing or partial file is valid.

use crate::chat::{DEFAULT_CHAT_PREFIX, DEFAULT_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Request paths, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub snapshot: String,
    pub reply: String,
    pub ai_reply: String,
    pub new_ai_chat: String,
    pub login: String,
    pub logout: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            snapshot: "/api/chats".to_string(),
            reply: "/send".to_string(),
            ai_reply: "/ai_reply".to_string(),
            new_ai_chat: "/new_ai_chat".to_string(),
            login: "/login".to_string(),
            logout: "/logout".to_string(),
        }
    }
}

/// Root configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://127.0.0.1:5000`
    pub base_url: String,
    /// Raw `Cookie` header value carrying the server session, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
    pub endpoints: EndpointConfig,
    /// Instruction placed at the head of AI transcripts
    pub system_prompt: String,
    /// Prefix of generated chat names
    pub default_chat_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            endpoints: EndpointConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            default_chat_prefix: DEFAULT_CHAT_PREFIX.to_string(),
        }
    }
}

impl ClientConfig {
    /// Joins `base_url` and an endpoint path without doubling the slash.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
base_url = "https://tutor.example.org/"

[endpoints]
reply = "/compute"
"#,
        )
        .unwrap();
        assert_eq!(config.endpoints.reply, "/compute");
        assert_eq!(config.endpoints.snapshot, "/api/chats");
        assert_eq!(config.default_chat_prefix, "Chat");
        assert_eq!(config.url(&config.endpoints.reply), "https://tutor.example.org/compute");
    }
}
