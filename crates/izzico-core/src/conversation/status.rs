//! Conversation lifecycle status.

use serde::{Deserialize, Serialize};

/// Per-turn state of the conversation.
///
/// A turn moves `Idle -> Submitted -> Streaming -> Idle`. Closing the
/// conversation moves any state to `Ended`; reopening starts over at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Idle,
    /// The turn was sent, no token has arrived yet.
    Submitted,
    /// Tokens are arriving.
    Streaming,
    /// The user closed the conversation.
    Ended,
}

impl ConversationStatus {
    /// True while a turn is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Submitted | Self::Streaming)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: ConversationStatus) -> bool {
        use ConversationStatus::*;
        matches!(
            (self, next),
            (Idle, Submitted)
                | (Submitted, Streaming)
                | (Submitted, Idle)
                | (Streaming, Idle)
                | (Ended, Idle)
                | (_, Ended)
        )
    }
}
