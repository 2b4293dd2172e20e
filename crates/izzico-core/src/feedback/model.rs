//! Feedback and suggestion payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

/// Thumbs up / thumbs down on one assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Valence {
    Up,
    Down,
}

/// A per-message rating, in flight to the feedback collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub message_id: String,
    pub valence: Valence,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    /// Thumbs up on a single reply.
    Helpful,
    /// Thumbs down on a single reply.
    NotHelpful,
    /// Rating of the conversation as a whole.
    Conversation,
}

/// Payload accepted by [`super::FeedbackClient::submit_feedback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    /// 1 to 5.
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl FeedbackSubmission {
    /// Conversation-level feedback. Rejects ratings outside 1..=5.
    pub fn conversation(rating: u8, text: Option<String>) -> Result<Self> {
        if !(1..=5).contains(&rating) {
            return Err(AssistantError::feedback(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }
        Ok(Self {
            rating,
            text: text.filter(|t| !t.trim().is_empty()),
            feedback_type: FeedbackType::Conversation,
            message_id: None,
        })
    }
}

impl From<&FeedbackRecord> for FeedbackSubmission {
    fn from(record: &FeedbackRecord) -> Self {
        let (rating, feedback_type) = match record.valence {
            Valence::Up => (5, FeedbackType::Helpful),
            Valence::Down => (1, FeedbackType::NotHelpful),
        };
        Self {
            rating,
            text: None,
            feedback_type,
            message_id: Some(record.message_id.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Feature,
    Improvement,
    Bug,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Free-text product suggestion collected from the feedback prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub text: String,
    pub category: SuggestionCategory,
    pub priority: SuggestionPriority,
}

impl Suggestion {
    pub fn new(
        text: impl Into<String>,
        category: SuggestionCategory,
        priority: SuggestionPriority,
    ) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AssistantError::feedback("suggestion text cannot be empty"));
        }
        Ok(Self {
            text,
            category,
            priority,
        })
    }
}
