//! Error types for the tutor client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire tutor client.
///
/// The first five variants form the operation-level taxonomy: every engine
/// operation handles them at its own boundary and leaves the session in a
/// valid state. The remaining variants cover ambient failures (files,
/// configuration, serialization).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorError {
    /// The remote side answered with an unauthorized signal.
    #[error("Authentication required")]
    AuthExpired,

    /// The request never produced a usable HTTP response.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The server answered with a structured application error.
    #[error("Application error: {0}")]
    Application(String),

    /// Input rejected before any mutation took place.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A success response was missing required fields.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TutorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an Application error
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an authentication expiry
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the human-readable reason without the variant prefix.
    ///
    /// Used when the failure is written into a conversation turn, where the
    /// user should see "connection refused" rather than "Transport error: ...".
    pub fn reason(&self) -> String {
        match self {
            Self::Transport { message } | Self::Io { message } => message.clone(),
            Self::Application(message)
            | Self::Validation(message)
            | Self::MalformedResponse(message)
            | Self::Config(message)
            | Self::Internal(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TutorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TutorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TutorError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at the binary boundary)
impl From<anyhow::Error> for TutorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, TutorError>`.
pub type Result<T> = std::result::Result<T, TutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strips_variant_prefix() {
        let err = TutorError::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");
        assert_eq!(err.reason(), "connection refused");
    }

    #[test]
    fn test_predicates() {
        assert!(TutorError::AuthExpired.is_auth_expired());
        assert!(TutorError::validation("empty").is_validation());
        assert!(TutorError::not_found("Chat", "Chat 9").is_not_found());
        assert!(!TutorError::application("rate limited").is_transport());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: TutorError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, TutorError::Serialization { ref format, .. } if format == "JSON"));
    }
}
