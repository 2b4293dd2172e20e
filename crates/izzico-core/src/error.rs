//! Error types for the IzzIco assistant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the assistant subsystem.
///
/// None of these variants is fatal to the hosting application: callers either
/// recover locally (parser, executor, session store, feedback tracker) or
/// surface them as a non-blocking error state in the conversation.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AssistantError {
    /// The conversation transport failed to send a turn or broke mid-stream
    #[error("Transport error: {0}")]
    Transport(String),

    /// Durable key-value storage failed (read, write or delete)
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// An action handler reported a failure
    #[error("Action handler error: {0}")]
    Handler(String),

    /// No handler is registered for the directive type
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    /// Feedback, suggestion or end-of-conversation submission failed
    #[error("Feedback error: {0}")]
    Feedback(String),

    /// Operation not valid in the current conversation state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted schema migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssistantError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    pub fn feedback(message: impl Into<String>) -> Self {
        Self::Feedback(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AssistantError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AssistantError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{:#}", err))
    }
}

/// A type alias for `Result<T, AssistantError>`.
pub type Result<T> = std::result::Result<T, AssistantError>;
