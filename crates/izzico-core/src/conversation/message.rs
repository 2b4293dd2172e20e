//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the author of a message in the assistant conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A finalized conversation message.
///
/// Messages are immutable once created. For assistant messages `clean_text`
/// is computed once, when the turn finishes, and never contains directive
/// markers. For user messages `clean_text` equals `raw_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: String,
    role: MessageRole,
    raw_text: String,
    clean_text: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(id: impl Into<String>, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let text = text.into();
        Self {
            id: id.into(),
            role: MessageRole::User,
            clean_text: text.clone(),
            raw_text: text,
            created_at,
        }
    }

    pub fn assistant(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        clean_text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Assistant,
            raw_text: raw_text.into(),
            clean_text: clean_text.into(),
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Text to display to the end user.
    pub fn clean_text(&self) -> &str {
        &self.clean_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
