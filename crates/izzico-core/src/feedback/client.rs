//! Feedback collaborator port.

use async_trait::async_trait;

use super::model::{FeedbackSubmission, Suggestion};
use crate::error::Result;

/// Remote collector for ratings, suggestions and conversation analytics.
///
/// Failures are reported to the caller, which logs them; they never block
/// the widget.
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    async fn submit_feedback(&self, submission: FeedbackSubmission) -> Result<()>;

    async fn submit_suggestion(&self, suggestion: Suggestion) -> Result<()>;

    /// Notifies the backend that the user closed a conversation.
    async fn end_conversation(&self, conversation_id: &str, turn_count: usize) -> Result<()>;
}
